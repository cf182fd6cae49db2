/// Overlay color for a track identity as `[r, g, b]`.
///
/// Deterministic so that an identity keeps its color for its whole lifetime;
/// nearby identities get visibly different colors.
pub fn track_color(track_id: u64) -> [u8; 3] {
    let channel = |k: u64| (k.wrapping_mul(track_id) % 255) as u8;
    [channel(37), channel(17), channel(29)]
}
