//! Useful functions.

/// Log-sum-exp of a slice. The log of an empty sum is negative infinity.
pub fn logsumexp(xs: &[f64]) -> f64 {
    let max = xs.iter().copied().fold(std::f64::NEG_INFINITY, f64::max);
    if max == std::f64::NEG_INFINITY {
        return max;
    }
    let sum = xs.iter().map(|x| (x - max).exp()).sum::<f64>().ln();
    debug_assert!(sum >= 0., "{:?}->{}", xs, sum);
    max + sum
}

/// Streaming log-sum-exp. Keeps the running maximum and rescales the accumulator
/// whenever a larger value comes in, so that no term overflows or underflows.
/// Negative infinities are zero terms and skipped.
pub fn logsumexp_str<I: IntoIterator<Item = f64>>(xs: I) -> f64 {
    let (mut max, mut accum) = (std::f64::NEG_INFINITY, 0f64);
    for x in xs {
        if x == std::f64::NEG_INFINITY {
            continue;
        }
        if x <= max {
            accum += (x - max).exp();
        } else {
            accum = (max - x).exp() * accum + 1f64;
            max = x;
        }
    }
    if accum == 0f64 {
        std::f64::NEG_INFINITY
    } else {
        accum.ln() + max
    }
}

#[link(name = "m")]
extern "C" {
    fn lgamma(x: f64) -> f64;
}

/// log Gamma(x) for positive x.
pub fn ln_gamma(x: f64) -> f64 {
    unsafe { lgamma(x) }
}

/// log P(k) of Poisson(lambda), k*log(lambda) - lambda - log(k!).
/// The factorial never materializes, so it is fine for large k.
pub fn ln_poisson(k: u64, lambda: f64) -> f64 {
    let k = k as f64;
    k * lambda.ln() - lambda - ln_gamma(k + 1f64)
}
