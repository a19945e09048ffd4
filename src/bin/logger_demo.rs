use ensemble::logger::*;

fn main() -> anyhow::Result<()> {
    let logger = Logger::new_bootstrap();
    trace!("bootstrap trace log");
    debug!("bootstrap debug log");
    info!("bootstrap info log");

    logger.reload("debug")?;
    trace!("application trace log");
    debug!("application debug log");
    info!("application info log");

    Ok(())
}
