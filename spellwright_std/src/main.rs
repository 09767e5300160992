fn main() -> anyhow::Result<()> {
    spellwright_std::run()
}
