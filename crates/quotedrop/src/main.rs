fn main() -> anyhow::Result<()> {
    quotedrop::init();

    quotedrop::cli::run()
}
