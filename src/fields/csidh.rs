//! Constants of the CSIDH-512 base field.
//!
//! Montgomery-domain values are stored with R = 2^512, all as little endian
//! u64 words.

pub const NWORDS: usize = 8;

/// Bit length of the modulus, also the number of ladder iterations.
pub const PBITS: usize = 511;

// CSIDH - 512
pub const CSIDH_512_MODULUS: [u64; NWORDS] = [
    0x1B81B90533C6C87B,
    0xC2721BF457ACA835,
    0x516730CC1F0B4F25,
    0xA7AAC6C567F35507,
    0x5AFBFCC69322C9CD,
    0xB42D083AEDC88C42,
    0xFC8AB0D15E3E4C4A,
    0x65B48E8F740F89BF,
];

/// (p - 1) / 2, the exponent of Euler's criterion.
pub const P_MINUS_1_HALF: [u64; NWORDS] = [
    0x8DC0DC8299E3643D,
    0xE1390DFA2BD6541A,
    0xA8B398660F85A792,
    0xD3D56362B3F9AA83,
    0x2D7DFE63499164E6,
    0x5A16841D76E44621,
    0xFE455868AF1F2625,
    0x32DA4747BA07C4DF,
];

/// -2 in Montgomery representation.
pub const MONT_MINUS_TWO: [u64; NWORDS] = [
    0xA50A561F36A8B2E2,
    0x8EACA7BA0E0BF13E,
    0xE86B24C8BA43DAE2,
    0xEE00A8A06FB3FE2B,
    0x21E7ECA772D0BAD1,
    0x390E316192B3498E,
    0xEB4024E83575C9C0,
    0x623B575CB85D3A7F,
];

/// An integer bound strictly above 4 sqrt(p). A point whose order exceeds it
/// certifies that the curve is supersingular.
pub const FOUR_SQRT_P: [u64; NWORDS] = [
    0x17895E71E1A20B3F,
    0x38D0CD95F8636A56,
    0x142B9541E59682CD,
    0x856F1399D91D6592,
    0x0000000000000002,
    0x0000000000000000,
    0x0000000000000000,
    0x0000000000000000,
];
