//! Two in-process pub/sub sessions reconciling on a timer.
//!
//! The local session publishes `PUB-PREFIX/<seq>/t=<now>` every 500 to
//! 700 ms and subscribes to `SUB-PREFIX`. A simulated peer publishes under
//! `SUB-PREFIX` and consumes the local publications. Both sessions exchange
//! summaries on every turn.

use anyhow::Context;
use rand::Rng;
use std::time::Duration;
use tracing::{info, warn};

use pubsync::{
    Clock, Name, Publication, PublishCallback, PubsubSession, SessionConfig, SystemClock,
    Timestamp,
};

const USAGE: &str = "usage: pubsync-demo SYNC-PREFIX SUB-PREFIX PUB-PREFIX";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_target(false).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() != 3 {
        eprintln!("{USAGE}");
        std::process::exit(2);
    }
    let sync_prefix = parse_prefix(&args[0])?;
    let sub_prefix = parse_prefix(&args[1])?;
    let pub_prefix = parse_prefix(&args[2])?;

    let config = SessionConfig::default();
    let mut local =
        PubsubSession::new(config.clone().with_describe(format!("{sync_prefix} local")))?;
    let mut peer = PubsubSession::new(config.with_describe(format!("{sync_prefix} peer")))?;

    let mut updates = local.subscribe(sub_prefix.clone());
    let mut peer_updates = peer.subscribe(pub_prefix.clone());

    info!(sync = %sync_prefix, sub = %sub_prefix, publ = %pub_prefix, "starting");

    let clock = SystemClock;
    let mut seq: u64 = 0;
    loop {
        let delay = Duration::from_millis(rand::thread_rng().gen_range(500..=700));
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            _ = tokio::time::sleep(delay) => {}
        }

        let now = clock.now();
        seq += 1;

        let name = pub_prefix.clone().append_generic(seq.to_string());
        let callback: PublishCallback = Box::new(|publication: &Publication, confirmed: bool| {
            if confirmed {
                info!(name = %publication.name(), "CONFIRM");
            } else {
                warn!(name = %publication.name(), "LOST");
            }
        });
        let payload = seq.to_string().into_bytes();
        let outcome = local.publish(name.clone(), payload, now, Some(callback))?;
        info!(%name, id = %outcome.id(), "PUBLISH");

        let peer_name = sub_prefix.clone().append_generic(format!("peer-{seq}"));
        peer.publish(peer_name, format!("msg {seq}").into_bytes(), now, None)?;

        exchange(&mut local, &mut peer, now)?;
        exchange(&mut peer, &mut local, now)?;

        while let Some(publication) = updates.try_recv() {
            log_update(&publication);
        }
        while peer_updates.try_recv().is_some() {}
    }

    local.close();
    peer.close();
    info!("stopped");
    Ok(())
}

fn parse_prefix(arg: &str) -> anyhow::Result<Name> {
    arg.parse()
        .with_context(|| format!("invalid name prefix {arg:?}"))
}

/// `to` ingests whatever `from` offers against its summary.
fn exchange(
    from: &mut PubsubSession,
    to: &mut PubsubSession,
    now: Timestamp,
) -> pubsync::Result<usize> {
    let Some(reply) = from.respond(&to.summary(), now) else {
        return Ok(0);
    };
    let report = to.ingest(reply.iter().map(|p| (**p).clone()), now)?;
    Ok(report.accepted())
}

fn log_update(publication: &Publication) {
    let payload = String::from_utf8_lossy(publication.payload());
    match publication.timestamp() {
        Some(ts) => info!(name = %publication.name(), %payload, ts = ts.as_micros(), "UPDATE"),
        None => info!(name = %publication.name(), %payload, "UPDATE"),
    }
}
