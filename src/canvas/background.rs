use rand::Rng;
use rand_distr::{Distribution, Triangular};
use tracing::{debug, warn};

/// Generates a noisy grey RGBA buffer of `width * height` pixels.
///
/// Each pixel is `(n, n, n, alpha)` with `n` drawn from a triangular
/// distribution over `grey +/- variance`, peaking at `grey`.
pub fn generate_background<R: Rng + ?Sized>(
    width: usize,
    height: usize,
    grey: u8,
    variance: u8,
    alpha: u8,
    rng: &mut R,
) -> Vec<u8> {
    debug!(
        "Generating {}x{} background: grey {} +/- {}, alpha {}",
        width, height, grey, variance, alpha
    );
    let low = f32::from(grey.saturating_sub(variance));
    let high = f32::from(grey.saturating_add(variance));

    let distribution = if variance == 0 {
        None
    } else {
        match Triangular::new(low, high, f32::from(grey)) {
            Ok(distribution) => Some(distribution),
            Err(e) => {
                warn!("Falling back to flat background: {}", e);
                None
            }
        }
    };

    let mut pixels = Vec::with_capacity(width * height * 4);
    for _ in 0..width * height {
        let n = match &distribution {
            Some(distribution) => distribution.sample(rng) as u8,
            None => grey,
        };
        pixels.extend_from_slice(&[n, n, n, alpha]);
    }
    pixels
}
