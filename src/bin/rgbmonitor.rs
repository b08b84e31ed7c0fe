use std::net::UdpSocket;
use std::process;

use clap::Parser;
use crossbeam::channel;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use rgb_udp_client::device::{self, DeviceMessage};

/// Print colors as a UDP light device would receive them.
#[derive(Parser, Debug)]
#[command(version)]
struct Args {
    /// Address to listen on.
    #[arg(long, default_value = "0.0.0.0:9909")]
    bind: String,
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let args = Args::parse();

    let socket = match UdpSocket::bind(&args.bind) {
        Ok(socket) => socket,
        Err(err) => {
            error!("[device] Unable to bind {}: {}", args.bind, err);
            process::exit(1);
        }
    };

    let (sender, receiver) = channel::unbounded::<DeviceMessage>();
    let listener = match device::start_listener_thread(socket, sender) {
        Ok(listener) => listener,
        Err(err) => {
            error!("[device] Unable to start listener: {}", err);
            process::exit(1);
        }
    };

    for message in receiver.iter() {
        match message {
            DeviceMessage::Frame { source, frame } => {
                info!(
                    "{} -> #{:02x}{:02x}{:02x} ({}, {}, {})",
                    source, frame.red, frame.green, frame.blue, frame.red, frame.green, frame.blue
                );
            }
        }
    }

    if listener.stop().is_err() {
        error!("[device] Listener thread crashed");
    }
}
