//! `rblscan nameservers` - Authoritative servers of a DNSBL zone.

use anyhow::Result;

use super::Context;
use crate::cli::args::NameserversArgs;
use crate::output;

pub async fn execute(ctx: Context, args: NameserversArgs) -> Result<()> {
    let client = ctx.client()?;
    let servers = client.nameservers(&args.dnsbl).await?;

    output::emit(output::render_nameservers(
        ctx.output_format,
        &args.dnsbl,
        &servers,
    ));

    Ok(())
}
