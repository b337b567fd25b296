pub const STARTING: &str = "Starting beacon...";

pub const GATEWAY_CONNECTING: &str = "Connecting to the Discord gateway...";

pub fn http_listening(addr: &str) -> String {
    format!("Keep-alive listener on {addr}")
}

pub fn keep_alive_started(url: &str, interval_secs: u64) -> String {
    format!("Keep-alive pinger started for {url} every {interval_secs}s")
}

pub const SHUTDOWN: &str = "Shutting down...";
