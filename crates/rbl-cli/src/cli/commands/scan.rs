//! `rblscan scan` - Check a whole CIDR block against a DNSBL.

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use rbl::RangeScan;

use super::Context;
use crate::cli::args::ScanArgs;
use crate::output;

pub async fn execute(ctx: Context, args: ScanArgs) -> Result<()> {
    // Range problems are reported before any resolver is set up
    let plan = RangeScan::parse(args.dnsbl, &args.cidr, ctx.scan.max_addresses)?;
    let scanner = ctx.scanner()?;

    let results = if ctx.progress {
        let bar = progress_bar(&plan, ctx.no_color);
        let mut listed = 0_usize;
        let results = scanner
            .scan_with_progress(&plan, |result| {
                if result.is_listed() {
                    listed += 1;
                    bar.set_message(format!("{listed} listed"));
                }
                bar.inc(1);
            })
            .await;
        bar.finish_and_clear();
        results
    } else {
        scanner.scan(&plan).await
    };

    output::emit(output::render_results(ctx.output_format, plan.list(), &results));

    Ok(())
}

fn progress_bar(plan: &RangeScan, no_color: bool) -> ProgressBar {
    let template = if no_color {
        "{elapsed_precise} [{bar:40}] {pos}/{len} {msg}"
    } else {
        "{elapsed_precise} [{bar:40.cyan/blue}] {pos}/{len} {msg}"
    };

    let bar = ProgressBar::new(plan.count() as u64);
    if let Ok(style) = ProgressStyle::with_template(template) {
        bar.set_style(style.progress_chars("=> "));
    }
    bar.set_message("0 listed");
    bar
}
