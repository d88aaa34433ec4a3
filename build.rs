use vergen_gitcl::{BuildBuilder, Emitter, GitclBuilder};

// --version and the generated include files name the commit they were built from
fn main() -> anyhow::Result<()> {
    let build = BuildBuilder::default().build_date(true).build()?;
    let git = GitclBuilder::default().sha(true).branch(true).build()?;

    Emitter::default()
        .add_instructions(&build)?
        .add_instructions(&git)?
        .emit()?;

    Ok(())
}
