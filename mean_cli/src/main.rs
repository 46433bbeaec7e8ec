mod args;
mod sink;
mod source;

use std::error::Error;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::num::NonZeroUsize;
use std::path::Path;
use std::thread;

use clap::Parser;
use mean_core::common::mean_exception::{ErrCode, MeanError};
use mean_core::pipeline::{consume, ConsumeStats, PriceSource, RecordSink};
use mean_core::Aggregator;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use args::Args;
use sink::build_sink;
use source::CsvPriceSource;

fn main() -> Result<(), Box<dyn Error>> {
    init_tracing();

    let args = Args::parse();
    let conf = args.load_config()?;
    info!(
        window_size = conf.window_size.get(),
        commit_interval = conf.commit_interval.get(),
        partitions = args.inputs.len(),
        "starting mean aggregator"
    );

    let sources = args
        .inputs
        .iter()
        .map(|path| CsvPriceSource::open(path))
        .collect::<Result<Vec<_>, _>>()?;

    let aggregator = Aggregator::new(&conf);
    let sink = build_sink(args.format, open_output(args.output.as_deref())?);

    let stats = run_partitions(sources, &aggregator, sink.as_ref(), conf.commit_interval)?;
    info!(
        read = stats.read,
        stored = stats.stored,
        rejected = stats.rejected,
        malformed = stats.malformed,
        sink_failures = stats.sink_failures,
        symbols = aggregator.symbol_count(),
        "finished"
    );
    for symbol in aggregator.symbols() {
        if let Some(means) = aggregator.current(&symbol) {
            info!(symbol = %symbol, "final means {}", means);
        }
    }
    Ok(())
}

fn init_tracing() {
    // Logs go to stderr so stdout stays free for records
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mean_cli=info,mean_core=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(true)
                .with_line_number(true)
                .with_thread_names(true),
        )
        .init();
}

fn open_output(path: Option<&Path>) -> io::Result<Box<dyn Write + Send>> {
    Ok(match path {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout())),
    })
}

/// Consume every partition on its own worker thread, sharing one aggregator
/// and one sink. Fails with the first partition error after all workers end.
fn run_partitions<S>(
    sources: Vec<S>,
    aggregator: &Aggregator,
    sink: &dyn RecordSink,
    commit_interval: NonZeroUsize,
) -> Result<ConsumeStats, MeanError>
where
    S: PriceSource + Send,
{
    let results: Vec<Result<ConsumeStats, MeanError>> = thread::scope(|s| {
        let handles: Vec<_> = sources
            .into_iter()
            .enumerate()
            .map(|(idx, mut source)| {
                thread::Builder::new()
                    .name(format!("partition-{}", idx))
                    .spawn_scoped(s, move || consume(&mut source, aggregator, sink, commit_interval))
            })
            .collect();

        handles
            .into_iter()
            .map(|handle| match handle {
                Ok(handle) => handle.join().unwrap_or_else(|_| {
                    Err(MeanError::new("partition worker panicked", ErrCode::SourceError))
                }),
                Err(e) => Err(MeanError::new(
                    format!("couldn't spawn partition worker: {}", e),
                    ErrCode::SourceError,
                )),
            })
            .collect()
    });

    let mut total = ConsumeStats::default();
    let mut first_err = None;
    for result in results {
        match result {
            Ok(stats) => total.merge(&stats),
            Err(e) => {
                error!("partition failed: {}", e);
                first_err.get_or_insert(e);
            }
        }
    }
    match first_err {
        Some(e) => Err(e),
        None => Ok(total),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use mean_core::MeanConfig;
    use sink::CsvSink;
    use std::io::Write as _;

    fn partition(rows: &[(&str, f64, i64)]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "id,name,price,timestamp").unwrap();
        for (id, price, ts) in rows {
            writeln!(file, "{},{} coin,{},{}", id, id, price, ts).unwrap();
        }
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_run_partitions_end_to_end() {
        let btc = partition(&[("BTC", 10.0, 1), ("BTC", 20.0, 2), ("BTC", 30.0, 3), ("BTC", 40.0, 4)]);
        let eth = partition(&[("ETH", 2.0, 1), ("ETH", -1.0, 2), ("ETH", 8.0, 3)]);
        let sources = vec![
            CsvPriceSource::open(btc.path()).unwrap(),
            CsvPriceSource::open(eth.path()).unwrap(),
        ];

        let conf = MeanConfig::from_json_str(r#"{"window_size": 3, "commit_interval": 2}"#).unwrap();
        let aggregator = Aggregator::new(&conf);
        let sink = CsvSink::new(Vec::new());

        let stats = run_partitions(sources, &aggregator, &sink, conf.commit_interval).unwrap();
        assert_eq!(stats.read, 7);
        assert_eq!(stats.stored, 6);
        assert_eq!(stats.rejected, 1);
        // BTC: after 2, after 4, at close; ETH: after 2, at close
        assert_eq!(stats.commits, 5);

        let btc_means = aggregator.current("BTC").unwrap();
        assert_relative_eq!(btc_means.arithmetic, 30.0, max_relative = 1e-12);
        assert_relative_eq!(btc_means.geometric, 24000f64.cbrt(), max_relative = 1e-12);
        let eth_means = aggregator.current("ETH").unwrap();
        assert_relative_eq!(eth_means.geometric, 4.0, max_relative = 1e-12);

        let out = String::from_utf8(sink.into_inner().unwrap()).unwrap();
        assert_eq!(out.lines().count(), 7);
        assert!(out.contains("BTC,BTC_coin,40.0,1970-01-01 00:00:04,30.0,"));
    }
}
