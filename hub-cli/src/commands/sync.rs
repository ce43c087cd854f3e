use crate::context::Context;
use crate::error::CliResult;
use crate::output::print_report;

pub async fn run(ctx: &Context, catalogue: &str, quiet: bool) -> CliResult<()> {
    let report = ctx.reconciler.sync(catalogue).await?;
    print_report("sync", catalogue, &report, quiet);
    Ok(())
}
