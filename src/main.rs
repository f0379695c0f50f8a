use std::net::Ipv4Addr;
use std::time::Duration;

use clap::Parser;
use log::debug;

use iterdns::trace::Tracer;
use iterdns::{ResolverConfig, Resolver, ResultLine, UdpTransport};

#[derive(Parser, Debug)]
#[command(
    name = "iterdns",
    version,
    about = "Resolve a name by following referrals from a reference name server"
)]
struct Cli {
    /// IPv4 address of the name server to start from (usually a root server)
    reference: Ipv4Addr,

    /// Fully qualified domain name to look up
    fqdn: String,

    /// Print every query sent and every response received
    #[arg(short = 't', long = "trace")]
    trace: bool,

    /// Time to wait for each reply, in milliseconds
    #[arg(long, default_value_t = 2000)]
    timeout_ms: u64,

    /// Datagrams sent to a server before giving up on it
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u32).range(1..))]
    attempts: u32,

    /// Bound on the whole lookup, in seconds
    #[arg(long, default_value_t = 30)]
    deadline_secs: u64,
}

impl Cli {
    fn config(&self) -> ResolverConfig {
        ResolverConfig {
            attempt_timeout: Duration::from_millis(self.timeout_ms),
            attempts: self.attempts,
            deadline: Duration::from_secs(self.deadline_secs),
            ..ResolverConfig::default()
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config = cli.config();
    debug!("starting at {} with {:?}", cli.reference, config);

    let mut resolver = Resolver::new(UdpTransport::new(), config);
    if cli.trace {
        resolver = resolver.with_observer(Box::new(Tracer::stdout()));
    }
    let outcome = resolver.resolve(cli.reference, &cli.fqdn);
    drop(resolver);

    println!(
        "{}",
        ResultLine {
            fqdn: &cli.fqdn,
            outcome
        }
    );
}
