// =============================================================================
// Metroid II RAM Addresses
// =============================================================================

/// Samus energy within the current tank, BCD `00..=99`.
pub const CURRENT_HP: u16 = 0xD051;
/// Filled energy tanks.
pub const CURRENT_ENERGY_TANKS: u16 = 0xD050;
/// Missile count, little endian BCD across two bytes.
pub const CURRENT_MISSILES: [u16; 2] = [0xD053, 0xD054];
pub const CURRENT_ARMOR_UPGRADE: u16 = 0xD045;
pub const CURRENT_BEAM_UPGRADE: u16 = 0xD04D;
/// Metroids left in the whole game, BCD.
pub const GLOBAL_METROIDS_REMAINING: u16 = 0xD09A;
/// Sound effect currently requested on the noise channel.
pub const CURRENT_SOUND_EFFECT: u16 = 0xCEC0;
pub const SAMUS_SCREEN_X: u16 = 0xFFC2;
pub const SAMUS_SCREEN_Y: u16 = 0xFFC1;

/// Noise channel effect played when an enemy is destroyed.
pub const ENEMY_DESTROYED_SFX: u8 = 0x02;

/// Decode one packed BCD byte, `0x42` -> `42`.
pub fn bcd(byte: u8) -> u16 {
    u16::from(byte >> 4) * 10 + u16::from(byte & 0x0F)
}

/// Encode `value % 100` as a packed BCD byte.
pub fn to_bcd(value: u16) -> u8 {
    let value = value % 100;
    (((value / 10) << 4) | (value % 10)) as u8
}
