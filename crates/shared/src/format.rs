const KIB: f64 = 1024.0;

/// Human readable size: bytes below 1 KB, otherwise one decimal of KB or MB.
pub fn bytes_pretty(size_bytes: u64) -> String {
    if size_bytes < 1024 {
        return format!("{size_bytes} B");
    }
    let kb = size_bytes as f64 / KIB;
    if kb < KIB {
        return format!("{kb:.1} KB");
    }
    format!("{:.1} MB", kb / KIB)
}
