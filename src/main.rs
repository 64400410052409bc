fn main() -> anyhow::Result<()> {
    printree::cli::run_cli()
}
