//! warehouse: end-to-end demo of the mission dispatch workspace.
//!
//! Generates a grid warehouse, starts a dispatcher on its own thread, feeds
//! it the graph, the slot set, and a seeded stream of pallet and order
//! arrivals, and lets a small AGV fleet claim missions off the queue.
//!
//! ```text
//! cargo run -p warehouse [-- config.json]
//! RUST_LOG=debug cargo run -p warehouse
//! ```

mod config;
mod fleet;

use std::path::Path;
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, anyhow};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use wh_core::{NodeId, NodeKind};
use wh_graph::WarehouseLayout;
use wh_mission::{Arrival, ChannelBus, DispatcherBuilder, Inbound, Outbound, Trigger};
use wh_output::{CsvLogWriter, DispatchLogObserver};
use wh_slots::generate_slots;

use config::DemoConfig;
use fleet::Fleet;

// ── Constants ─────────────────────────────────────────────────────────────────

/// How long the main thread waits for the dispatcher's replies per step.
const REPLY_WAIT: Duration = Duration::from_millis(20);

/// Simulated time between arrivals.
const STEP_MS: u64 = 1_000;

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    init_tracing();

    let config = match std::env::args_os().nth(1) {
        Some(path) => DemoConfig::load(Path::new(&path))?,
        None => DemoConfig::default(),
    };
    config.validate()?;

    println!("=== warehouse: mission dispatch demo ===");
    println!(
        "Shelves: {}  |  Shelf length: {}  |  Levels: {}  |  AGVs: {}  |  Seed: {}",
        config.layout.shelves,
        config.layout.columns_per_shelf,
        config.layout.levels_per_shelf,
        config.layout.agvs,
        config.seed,
    );
    println!();

    // 1. Floor plan, graph, and slots.
    let layout = WarehouseLayout::generate(config.layout)?;
    print!("{}", layout.render());
    let graph = layout.to_graph();
    let slots = generate_slots(&graph, config.layout.levels_per_shelf);
    println!(
        "Graph: {} nodes, {} edges  |  Slots: {}",
        graph.node_count(),
        graph.edge_count(),
        slots.len()
    );
    println!();

    let homes: Vec<NodeId> = graph.nodes_of_kind(NodeKind::AgvStart).collect();
    let mut fleet = Fleet::new(homes, config.agv_hops_per_step);

    // 2. Dispatcher thread.  Graph and slots arrive over the inbox like any
    //    other message.
    std::fs::create_dir_all(&config.output_dir)
        .with_context(|| format!("creating {}", config.output_dir.display()))?;
    let writer = CsvLogWriter::new(&config.output_dir)?;
    let mut observer = DispatchLogObserver::new(writer);

    let (inbox_tx, inbox_rx) = mpsc::channel::<Inbound>();
    let (bus_tx, bus_rx) = mpsc::channel::<(String, Outbound)>();
    let mut dispatcher = DispatcherBuilder::new(config.dispatch.clone(), ChannelBus::new(bus_tx)).build()?;
    let topics = dispatcher.topics().clone();

    let worker = thread::spawn(move || {
        let stats = dispatcher.run(&inbox_rx, &mut observer);
        (stats, dispatcher.slots().in_use_count(), observer)
    });

    let send = |message: Inbound| inbox_tx.send(message).map_err(|_| anyhow!("dispatcher stopped"));
    send(Inbound::Graph(graph.to_snapshot()))?;
    send(Inbound::SlotSnapshot { slots })?;

    // 3. Arrivals, one per step, with the fleet claiming in between.
    let mut rng = SmallRng::seed_from_u64(config.seed);
    let t0 = Instant::now();
    let (mut pallets, mut orders) = (0u32, 0u32);

    for step in 0..config.arrivals as u64 {
        let trigger = if rng.gen_bool(config.order_probability) {
            orders += 1;
            Trigger::Order
        } else {
            pallets += 1;
            Trigger::Pallet
        };
        let arrival = Arrival { trigger, id: step + 1, timestamp_ms: step * STEP_MS };
        info!(topic = %topics.arrival(trigger), id = arrival.id, "arrival");
        send(Inbound::Arrival(arrival))?;

        drain_replies(&bus_rx, &mut fleet);
        if let Some(remainder) = fleet.step(step) {
            send(Inbound::Missions(remainder))?;
        }
    }

    drop(inbox_tx);
    let (stats, in_use, mut observer) = worker
        .join()
        .map_err(|_| anyhow!("dispatcher thread panicked"))?;
    let elapsed = t0.elapsed();
    drain_replies(&bus_rx, &mut fleet);

    if let Some(e) = observer.take_error() {
        warn!(error = %e, "dispatch log incomplete");
    }

    // 4. Summary.
    println!("Dispatch complete in {:.3} s", elapsed.as_secs_f64());
    println!("  arrivals            : {} pallets, {} orders", pallets, orders);
    println!("  storage missions    : {}", stats.storage_dispatched);
    println!("  retrieval missions  : {}", stats.retrieval_dispatched);
    println!("  dropped arrivals    : {}", stats.dropped);
    println!("  slots in use        : {in_use}");
    println!("  missions unclaimed  : {}", fleet.pending());
    println!("  log                 : {}", config.output_dir.display());
    println!();

    println!("{:<6} {:<8} {:<10} {:<10}", "AGV", "Home", "Missions", "Hops");
    println!("{}", "-".repeat(36));
    for agv in &fleet.agvs {
        println!("{:<6} {:<8} {:<10} {:<10}", agv.id, agv.home.0, agv.completed, agv.hops_total);
    }

    Ok(())
}

/// Install a `fmt` subscriber filtered by `RUST_LOG`, defaulting to `info`.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();
}

/// Collect whatever the dispatcher published since the last step.
fn drain_replies(bus: &Receiver<(String, Outbound)>, fleet: &mut Fleet) {
    while let Ok((topic, message)) = bus.recv_timeout(REPLY_WAIT) {
        match message {
            Outbound::Missions(snapshot) => fleet.observe(snapshot),
            Outbound::SlotUpdate(slot) => {
                tracing::debug!(%topic, slot = %slot.id, in_use = slot.in_use, "slot update")
            }
        }
    }
}
