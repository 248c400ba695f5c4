mod fake_completion_client;
mod memory_project_writer;

pub use fake_completion_client::SequenceClient;
pub use memory_project_writer::MemoryProjectWriter;
