/// Scale a raw sample by the live volume: `(raw × volume) >> 8`.
///
/// The product is taken in 16 bits, so it cannot overflow. Full volume is
/// therefore 255/256, not unity: `scale(255, 255) == 254`.
///
/// ```
/// use buddhabox::engine::scale;
///
/// assert_eq!(scale(255, 255), 254);
/// assert_eq!(scale(128, 0), 0);
/// ```
#[inline]
pub fn scale(raw: u8, volume: u8) -> u8 {
    ((u16::from(raw) * u16::from(volume)) >> 8) as u8
}
