use entity::otp::Otp;
pub use entity::otp::OTP_LENGTH;
use rand::Rng;

/// Draws a fresh uniformly random 6-digit passcode, leading zeros kept.
pub fn generate() -> Otp {
    let code: u32 = rand::thread_rng().gen_range(0..10u32.pow(OTP_LENGTH as u32));
    Otp::new(format!("{code:0width$}", width = OTP_LENGTH))
}
