fn main() {
    veridiff::cli::run();
}
