//! QuickServe demo entry point.

use anyhow::Context;

fn main() -> anyhow::Result<()> {
    quickserve_demo::init_tracing();

    let report = quickserve_demo::run().context("demo run failed")?;
    print!("{}", quickserve_demo::render_report(&report));
    Ok(())
}
