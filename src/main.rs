fn main() {
    crumbs::cli::run();
}
