//! In-process WHOIS servers for tests

use std::collections::HashMap;
use std::io;
use std::net::SocketAddr;
use std::sync::atomic::{ AtomicUsize, Ordering };
use std::sync::{ Arc, Mutex };
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{ AsyncBufReadExt, AsyncWriteExt, BufReader };
use tokio::net::{ TcpListener, TcpStream };

use crate::services::Connector;

/// Routes fake host names to local listeners, ignoring the port
#[derive(Debug, Default)]
pub struct MapConnector {
    hosts: HashMap<String, SocketAddr>,
    dialed: AtomicUsize,
}

impl MapConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, host: &str, addr: SocketAddr) -> Self {
        self.hosts.insert(host.to_string(), addr);
        self
    }

    /// Number of connect attempts so far
    pub fn dialed(&self) -> usize {
        self.dialed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Connector for MapConnector {
    async fn connect(&self, server: &str, _port: u16) -> io::Result<TcpStream> {
        self.dialed.fetch_add(1, Ordering::SeqCst);
        match self.hosts.get(server) {
            Some(addr) => TcpStream::connect(addr).await,
            None =>
                Err(io::Error::new(io::ErrorKind::NotFound, format!("unknown host {}", server))),
        }
    }
}

/// Never completes a connection within any reasonable timeout
#[derive(Debug, Default)]
pub struct StalledConnector;

#[async_trait]
impl Connector for StalledConnector {
    async fn connect(&self, _server: &str, _port: u16) -> io::Result<TcpStream> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Err(io::Error::new(io::ErrorKind::Other, "stalled connect gave up"))
    }
}

type Responder = Arc<dyn Fn(&str) -> Vec<u8> + Send + Sync>;

#[derive(Clone, Copy, Default)]
struct Behavior {
    reply_delay: Option<Duration>,
    hold_open: bool,
}

/// Answers every connection and records the query lines
pub struct WhoisFixture {
    addr: SocketAddr,
    queries: Arc<Mutex<Vec<String>>>,
    peak: Arc<AtomicUsize>,
}

impl WhoisFixture {
    /// Replies, then closes the connection
    pub async fn start(reply: &str) -> Self {
        Self::start_raw(reply.as_bytes()).await
    }

    /// Replies with bytes that need not be UTF-8
    pub async fn start_raw(reply: &[u8]) -> Self {
        let reply = reply.to_vec();
        Self::spawn(Arc::new(move |_: &str| reply.clone()), Behavior::default()).await
    }

    /// Replies, then keeps the connection open without sending anything else
    pub async fn start_held_open(reply: String) -> Self {
        let behavior = Behavior { hold_open: true, ..Behavior::default() };
        Self::spawn(Arc::new(move |_: &str| reply.clone().into_bytes()), behavior).await
    }

    /// Waits `delay` after reading the query before replying
    pub async fn start_slow(reply: &str, delay: Duration) -> Self {
        let reply = reply.as_bytes().to_vec();
        let behavior = Behavior { reply_delay: Some(delay), ..Behavior::default() };
        Self::spawn(Arc::new(move |_: &str| reply.clone()), behavior).await
    }

    /// Builds each reply from the received query line, CRLF stripped
    pub async fn start_with<F>(responder: F) -> Self
        where F: Fn(&str) -> String + Send + Sync + 'static
    {
        let responder = move |query: &str| responder(query).into_bytes();
        Self::spawn(Arc::new(responder), Behavior::default()).await
    }

    async fn spawn(responder: Responder, behavior: Behavior) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let queries = Arc::new(Mutex::new(Vec::new()));
        let peak = Arc::new(AtomicUsize::new(0));
        let active = Arc::new(AtomicUsize::new(0));
        let recorded = queries.clone();
        let seen_peak = peak.clone();

        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let responder = responder.clone();
                let recorded = recorded.clone();
                let active = active.clone();
                let seen_peak = seen_peak.clone();

                let now = active.fetch_add(1, Ordering::SeqCst) + 1;
                seen_peak.fetch_max(now, Ordering::SeqCst);

                tokio::spawn(async move {
                    let mut reader = BufReader::new(stream);
                    let mut query = String::new();
                    if reader.read_line(&mut query).await.is_ok() {
                        let reply = responder(query.trim_end_matches(['\r', '\n']));
                        recorded.lock().unwrap().push(query);

                        if let Some(delay) = behavior.reply_delay {
                            tokio::time::sleep(delay).await;
                        }
                        let _ = reader.get_mut().write_all(&reply).await;
                        if behavior.hold_open {
                            tokio::time::sleep(Duration::from_secs(30)).await;
                        }
                    }
                    // Released before the socket closes, so a client that saw
                    // EOF never overlaps with this connection
                    active.fetch_sub(1, Ordering::SeqCst);
                    drop(reader);
                });
            }
        });

        Self { addr, queries, peak }
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn queries(&self) -> Vec<String> {
        self.queries.lock().unwrap().clone()
    }

    /// Highest number of connections open at the same time
    pub fn peak_connections(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

/// Accepts connections and never reads from them
pub async fn silent_listener() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((stream, _)) = listener.accept().await {
            held.push(stream);
        }
    });

    addr
}
