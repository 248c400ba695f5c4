fn main() {
    initiatep::app::cli::run();
}
