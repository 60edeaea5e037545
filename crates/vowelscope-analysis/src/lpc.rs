//! Linear prediction: autocorrelation, Levinson-Durbin and Burg solvers.
//!
//! Both solvers produce an [`LpModel`] describing the all-pole filter
//!
//! ```text
//! A(z) = 1 + a[1]·z⁻¹ + … + a[p]·z⁻ᵖ
//! ```
//!
//! Accumulation runs in `f64`; sample buffers stay `f32`.
//!
//! Degenerate input (zero energy, a vanishing prediction error) is reported
//! as an [`LpError`] instead of letting NaN or infinity leak into the
//! coefficients.
//!
//! # References
//!
//! - Makhoul, "Linear Prediction: A Tutorial Review", Proc. IEEE 63(4), 1975.
//! - Burg, "Maximum Entropy Spectral Analysis", 1975.

use std::f64::consts::PI;
use thiserror::Error;

/// Why a linear-prediction model could not be built.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum LpError {
    /// Order zero, or not enough samples for the requested order.
    #[error("order {order} needs more than {len} samples")]
    TooShort {
        /// Requested model order.
        order: usize,
        /// Samples (or autocorrelation lags) available.
        len: usize,
    },

    /// The input carries no energy (`r[0] == 0`).
    #[error("input has zero energy")]
    ZeroEnergy,

    /// The prediction error collapsed or went non-finite at this order.
    #[error("prediction error vanished at order {0}")]
    Unstable(usize),
}

/// All-pole model `a[0..=order]` with `a[0] = 1` and its residual error energy.
#[derive(Debug, Clone, PartialEq)]
pub struct LpModel {
    coefficients: Vec<f64>,
    error: f64,
}

impl LpModel {
    /// Model order `p`.
    pub fn order(&self) -> usize {
        self.coefficients.len() - 1
    }

    /// Coefficients `a[0..=p]`, `a[0] == 1`.
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Residual prediction error energy.
    pub fn error(&self) -> f64 {
        self.error
    }

    /// Evaluate `1 / |A(e^{jω})|` at `points` frequencies.
    ///
    /// Point `k` sits at `ω = π·k / (points - 1)`, so the first point is DC
    /// and the last is Nyquist.
    pub fn envelope(&self, points: usize) -> Vec<f32> {
        if points == 0 {
            return Vec::new();
        }
        let step = if points > 1 { PI / (points - 1) as f64 } else { 0.0 };

        (0..points)
            .map(|k| {
                let w = step * k as f64;
                let (mut re, mut im) = (0.0f64, 0.0f64);
                for (j, &a) in self.coefficients.iter().enumerate() {
                    let phase = w * j as f64;
                    re += a * phase.cos();
                    im -= a * phase.sin();
                }
                let mag = (re * re + im * im).sqrt();
                (1.0 / mag.max(1e-12)) as f32
            })
            .collect()
    }

    /// One-step prediction `x̂[i] = -Σ_{k=1..p} a[k]·x[i-k]`.
    ///
    /// Terms reaching before the start of `signal` are dropped.
    pub fn predict(&self, signal: &[f32]) -> Vec<f32> {
        (0..signal.len())
            .map(|i| {
                let mut acc = 0.0f64;
                for (k, &a) in self.coefficients.iter().enumerate().skip(1).take(i) {
                    acc -= a * signal[i - k] as f64;
                }
                acc as f32
            })
            .collect()
    }

    /// Zero-phase prediction: the mean of the forward prediction and the
    /// backward prediction (the same coefficients run over the reversed
    /// sequence).
    ///
    /// Within `p` samples of either end only the side with a full history
    /// is used.
    pub fn predict_centered(&self, signal: &[f32]) -> Vec<f32> {
        let p = self.order();
        let len = signal.len();
        let forward = self.predict(signal);
        let reversed: Vec<f32> = signal.iter().rev().copied().collect();
        let mut backward = self.predict(&reversed);
        backward.reverse();

        forward
            .into_iter()
            .zip(backward)
            .enumerate()
            .map(|(i, (f, b))| match (i >= p, i + p < len) {
                (true, false) => f,
                (false, true) => b,
                _ => 0.5 * (f + b),
            })
            .collect()
    }
}

/// Raw autocorrelation `r[0..=max_lag]`, `r[k] = Σ x[i]·x[i+k]`.
pub fn autocorrelation(signal: &[f32], max_lag: usize) -> Vec<f64> {
    (0..=max_lag)
        .map(|lag| {
            signal
                .iter()
                .zip(signal.iter().skip(lag))
                .map(|(&a, &b)| a as f64 * b as f64)
                .sum()
        })
        .collect()
}

/// Solve the Toeplitz normal equations for `autocorr[0..=p]`.
///
/// At each order `k`:
///
/// ```text
/// κ    = -(r[k] + Σ_{j=1}^{k-1} a[j]·r[k-j]) / e[k-1]
/// a[j] = a[j] + κ·a[k-j]      (j < k)
/// a[k] = κ
/// e[k] = (1 - κ²)·e[k-1]
/// ```
pub fn levinson_durbin(autocorr: &[f64]) -> Result<LpModel, LpError> {
    let Some((&r0, _)) = autocorr.split_first() else {
        return Err(LpError::TooShort { order: 0, len: 0 });
    };
    if r0 <= 0.0 || !r0.is_finite() {
        return Err(LpError::ZeroEnergy);
    }

    let order = autocorr.len() - 1;
    let mut a = vec![0.0f64; order + 1];
    a[0] = 1.0;
    let mut error = r0;
    let mut prev = a.clone();

    for k in 1..=order {
        if error <= 0.0 || !error.is_finite() {
            return Err(LpError::Unstable(k));
        }

        let mut acc = autocorr[k];
        for j in 1..k {
            acc += a[j] * autocorr[k - j];
        }
        let reflection = -acc / error;

        prev[..k].copy_from_slice(&a[..k]);
        for j in 1..k {
            a[j] = prev[j] + reflection * prev[k - j];
        }
        a[k] = reflection;

        error *= 1.0 - reflection * reflection;
    }

    if error < 0.0 || !error.is_finite() {
        return Err(LpError::Unstable(order));
    }

    Ok(LpModel {
        coefficients: a,
        error,
    })
}

/// Burg's method: fit an order-`order` model directly on `data`.
///
/// Keeps forward (`f`) and backward (`b`) prediction error sequences and at
/// each order picks the reflection coefficient minimising their summed power:
///
/// ```text
/// κ = -2·Σ f[i]·b[i-1] / Σ (f[i]² + b[i-1]²)
/// ```
pub fn burg(data: &[f32], order: usize) -> Result<LpModel, LpError> {
    let n = data.len();
    if order == 0 || n <= order {
        return Err(LpError::TooShort { order, len: n });
    }

    let mut forward: Vec<f64> = data.iter().map(|&x| x as f64).collect();
    let mut backward = forward.clone();

    let energy: f64 = forward.iter().map(|x| x * x).sum();
    if energy <= 0.0 || !energy.is_finite() {
        return Err(LpError::ZeroEnergy);
    }

    let mut a = vec![0.0f64; order + 1];
    a[0] = 1.0;
    let mut prev = a.clone();
    let mut error = energy / n as f64;

    for k in 1..=order {
        let mut num = 0.0f64;
        let mut den = 0.0f64;
        for i in k..n {
            num += forward[i] * backward[i - 1];
            den += forward[i] * forward[i] + backward[i - 1] * backward[i - 1];
        }
        if den <= 0.0 || !den.is_finite() {
            return Err(LpError::Unstable(k));
        }
        let reflection = -2.0 * num / den;

        prev[..k].copy_from_slice(&a[..k]);
        for j in 1..k {
            a[j] = prev[j] + reflection * prev[k - j];
        }
        a[k] = reflection;

        // Descending so backward[i - 1] is still the previous stage's value.
        for i in (k..n).rev() {
            let f = forward[i];
            let b = backward[i - 1];
            forward[i] = f + reflection * b;
            backward[i] = b + reflection * f;
        }

        error *= 1.0 - reflection * reflection;
    }

    Ok(LpModel {
        coefficients: a,
        error,
    })
}

/// First-difference pre-emphasis `y[i] = x[i] - c·x[i-1]`, `y[0] = x[0]`.
pub fn pre_emphasis(signal: &[f32], coefficient: f32) -> Vec<f32> {
    let mut out = Vec::with_capacity(signal.len());
    let mut prev = 0.0f32;
    for &x in signal {
        out.push(x - coefficient * prev);
        prev = x;
    }
    out
}

/// Undo [`pre_emphasis`]: `y[n] = x[n] + c·y[n-1]`.
pub fn de_emphasis(signal: &[f32], coefficient: f32) -> Vec<f32> {
    let mut out = Vec::with_capacity(signal.len());
    let mut prev = 0.0f32;
    for &x in signal {
        prev = x + coefficient * prev;
        out.push(prev);
    }
    out
}
