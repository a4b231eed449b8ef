use std::{env, io, net::SocketAddr, path::Path};

// Runtime/server constants.

pub fn listen_addr() -> SocketAddr {
    env::var("SYNC_SERVER_ADDR")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 12345)))
}

pub fn map_path() -> String {
    env::var("SYNC_MAP_PATH").unwrap_or_else(|_| "mapa.txt".to_string())
}

// Read the map file into lines. Line terminators (including `\r\n`) are stripped.
pub fn load_map_lines(path: impl AsRef<Path>) -> io::Result<Vec<String>> {
    let contents = std::fs::read_to_string(path)?;
    Ok(contents.lines().map(str::to_string).collect())
}
