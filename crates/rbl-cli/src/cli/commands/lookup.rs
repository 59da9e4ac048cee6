//! `rblscan lookup` - Check one host against a DNSBL.

use anyhow::Result;

use super::Context;
use crate::cli::args::LookupArgs;
use crate::output;

pub async fn execute(ctx: Context, args: LookupArgs) -> Result<()> {
    let client = ctx.client()?;
    let host = client.lookup(&args.dnsbl, &args.target).await;

    output::emit(output::render_host(ctx.output_format, &host));

    Ok(())
}
