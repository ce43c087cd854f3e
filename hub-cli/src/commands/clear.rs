use crate::context::Context;
use crate::error::{CliError, CliResult};
use crate::output::print_report;

pub async fn run(ctx: &Context, catalogue: &str, force: bool, keep_index: bool, quiet: bool) -> CliResult<()> {
    if !force {
        return Err(CliError::Usage(format!(
            "clear deletes every dataset in '{catalogue}'; pass --force to confirm"
        )));
    }
    let report = ctx.reconciler.clear(catalogue, keep_index).await?;
    print_report("clear", catalogue, &report, quiet);
    Ok(())
}
