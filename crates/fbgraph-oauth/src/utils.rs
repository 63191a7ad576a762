use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::{CryptoRng, RngCore, rngs::ThreadRng};
use smol_str::SmolStr;

/// Fresh CSRF `state` value for one authorization round trip.
pub fn generate_state() -> SmolStr {
    URL_SAFE_NO_PAD
        .encode(get_random_values::<_, 24>(&mut ThreadRng::default()))
        .into()
}

pub fn get_random_values<R, const LEN: usize>(rng: &mut R) -> [u8; LEN]
where
    R: RngCore + CryptoRng,
{
    let mut bytes = [0u8; LEN];
    rng.fill_bytes(&mut bytes);
    bytes
}
