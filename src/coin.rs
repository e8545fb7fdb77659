/// Base units (octas) in one APT
pub const OCTAS_PER_APT: u64 = 100_000_000;

/// Render an octa amount as APT with all 8 decimals
pub fn format_apt(octas: u64) -> String {
    format!("{}.{:08}", octas / OCTAS_PER_APT, octas % OCTAS_PER_APT)
}

/// Signed difference between two balances, rendered as APT
pub fn format_apt_diff(before: u64, after: u64) -> String {
    if after >= before {
        format!("+{}", format_apt(after - before))
    } else {
        format!("-{}", format_apt(before - after))
    }
}
