pub mod http;
pub mod retrying;

pub use self::http::{API_KEY_ENV, HttpCompletionClient};
pub use self::retrying::{RetryPolicy, RetryingCompletionClient};
