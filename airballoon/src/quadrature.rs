//! Adaptive Gauss–Kronrod quadrature.
//!
//! [`Quadrature`] integrates a fallible function over a finite interval with
//! the globally adaptive scheme of QUADPACK's `QAG`: each interval is
//! estimated with the 21-point Kronrod rule and its embedded 10-point Gauss
//! rule, and the interval with the largest error estimate is bisected until
//! the total error meets the tolerance.
//!
//! Nodes are strictly interior, so integrable endpoint singularities (such as
//! the `1/√(y − y_obs)` behaviour of a horizontal line of sight) are never
//! evaluated directly.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::error::{QuadratureFailure, Result};

/// Kronrod abscissae on `[-1, 1]`, positive half. Odd indices are the
/// 10-point Gauss nodes.
const XGK: [f64; 11] = [
    0.995_657_163_025_808_080_735_527_280_689_003,
    0.973_906_528_517_171_720_077_964_012_084_452,
    0.930_157_491_355_708_226_001_207_180_059_508,
    0.865_063_366_688_984_510_732_096_688_423_493,
    0.780_817_726_586_416_897_063_717_578_345_042,
    0.679_409_568_299_024_406_234_327_365_114_874,
    0.562_757_134_668_604_683_339_000_099_272_694,
    0.433_395_394_129_247_190_799_265_943_165_784,
    0.294_392_862_701_460_198_131_126_603_103_866,
    0.148_874_338_981_631_210_884_826_001_129_720,
    0.0,
];

/// Kronrod weights matching [`XGK`].
const WGK: [f64; 11] = [
    0.011_694_638_867_371_874_278_064_396_062_192,
    0.032_558_162_307_964_727_478_818_972_459_390,
    0.054_755_896_574_351_996_031_381_300_244_580,
    0.075_039_674_810_919_952_767_043_140_916_190,
    0.093_125_454_583_697_605_535_065_465_083_366,
    0.109_387_158_802_297_641_899_210_590_325_805,
    0.123_491_976_262_065_851_077_600_525_607_826,
    0.134_709_217_311_473_325_928_054_001_771_707,
    0.142_775_938_577_060_080_797_094_273_138_717,
    0.147_739_104_901_338_491_374_841_515_972_068,
    0.149_445_554_002_916_905_664_936_468_389_821,
];

/// 10-point Gauss weights for the nodes `XGK[1], XGK[3], ..., XGK[9]`.
const WG: [f64; 5] = [
    0.066_671_344_308_688_137_593_568_809_893_332,
    0.149_451_349_150_580_593_145_776_339_657_697,
    0.219_086_362_515_982_043_995_534_934_228_163,
    0.269_266_719_309_996_355_091_226_921_569_469,
    0.295_524_224_714_752_870_173_892_994_651_338,
];

/// Function evaluations per 21-point rule.
const NODES_PER_RULE: usize = 21;

/// Default maximum number of intervals.
pub const DEFAULT_MAX_SUBDIVISIONS: usize = 200;

/// Error target for [`Quadrature`].
///
/// The integration stops once `abs_error <= max(absolute, relative * |value|)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    /// Absolute error bound.
    pub absolute: f64,
    /// Relative error bound.
    pub relative: f64,
}

impl Tolerance {
    pub fn new(absolute: f64, relative: f64) -> Self {
        Self { absolute, relative }
    }

    /// Error bound for an integral currently estimated at `value`.
    pub fn bound(&self, value: f64) -> f64 {
        self.absolute.max(self.relative * value.abs())
    }
}

impl Default for Tolerance {
    /// Purely relative: 0.1%.
    fn default() -> Self {
        Self {
            absolute: 0.0,
            relative: 1e-3,
        }
    }
}

/// Result of a successful integration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Estimate {
    /// Approximate value of the integral.
    pub value: f64,
    /// Estimated absolute error of `value`.
    pub abs_error: f64,
    /// Number of integrand evaluations.
    pub evaluations: usize,
    /// Number of intervals in the final partition.
    pub subdivisions: usize,
}

/// Globally adaptive 21-point Gauss–Kronrod integrator.
///
/// # Example
///
/// ```
/// use airballoon::quadrature::Quadrature;
///
/// let quad = Quadrature::default();
/// let estimate = quad.integrate(|x| Ok(x * x), 0.0, 3.0)?;
/// assert!((estimate.value - 9.0).abs() < 1e-9);
/// # Ok::<(), airballoon::AirmassError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quadrature {
    tolerance: Tolerance,
    max_subdivisions: usize,
}

impl Default for Quadrature {
    fn default() -> Self {
        Self {
            tolerance: Tolerance::default(),
            max_subdivisions: DEFAULT_MAX_SUBDIVISIONS,
        }
    }
}

impl Quadrature {
    pub fn new(tolerance: Tolerance, max_subdivisions: usize) -> Self {
        Self {
            tolerance,
            max_subdivisions: max_subdivisions.max(1),
        }
    }

    pub fn tolerance(&self) -> Tolerance {
        self.tolerance
    }

    pub fn max_subdivisions(&self) -> usize {
        self.max_subdivisions
    }

    /// Integrate `f` over `[a, b]`.
    ///
    /// Errors returned by `f` abort the integration and are passed through
    /// unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`crate::AirmassError::IntegrationFailure`] if the tolerance is
    /// not met within the subdivision limit, an interval becomes too small to
    /// bisect, or `f` returns a non-finite value.
    pub fn integrate<F>(&self, f: F, a: f64, b: f64) -> Result<Estimate>
    where
        F: Fn(f64) -> Result<f64>,
    {
        if a == b {
            return Ok(Estimate {
                value: 0.0,
                abs_error: 0.0,
                evaluations: 0,
                subdivisions: 1,
            });
        }

        let first = Segment::evaluate(&f, a, b)?;
        let mut evaluations = NODES_PER_RULE;
        let mut value = first.value;
        let mut abs_error = first.abs_error;

        let mut heap = BinaryHeap::with_capacity(self.max_subdivisions);
        heap.push(first);

        while abs_error > self.tolerance.bound(value) {
            if heap.len() >= self.max_subdivisions {
                return Err(QuadratureFailure::SubdivisionLimit {
                    limit: self.max_subdivisions,
                    estimate: value,
                    abs_error,
                }
                .into());
            }

            // Non-empty: the loop only runs after at least one push
            let Some(worst) = heap.pop() else { break };
            let mid = 0.5 * (worst.a + worst.b);
            if mid == worst.a || mid == worst.b {
                return Err(QuadratureFailure::Roundoff {
                    a: worst.a,
                    b: worst.b,
                }
                .into());
            }

            let left = Segment::evaluate(&f, worst.a, mid)?;
            let right = Segment::evaluate(&f, mid, worst.b)?;
            evaluations += 2 * NODES_PER_RULE;

            heap.push(left);
            heap.push(right);

            // Re-sum rather than patch the totals to avoid drift
            value = heap.iter().map(|s| s.value).sum();
            abs_error = heap.iter().map(|s| s.abs_error).sum();
        }

        Ok(Estimate {
            value,
            abs_error,
            evaluations,
            subdivisions: heap.len(),
        })
    }
}

/// One interval of the adaptive partition, ordered by error estimate.
#[derive(Debug, Clone, Copy)]
struct Segment {
    a: f64,
    b: f64,
    value: f64,
    abs_error: f64,
}

impl Segment {
    /// Apply the 21-point Kronrod rule to `[a, b]`.
    fn evaluate<F>(f: &F, a: f64, b: f64) -> Result<Self>
    where
        F: Fn(f64) -> Result<f64>,
    {
        let sample = |x: f64| -> Result<f64> {
            let value = f(x)?;
            if value.is_finite() {
                Ok(value)
            } else {
                Err(QuadratureFailure::NonFinite { x, value }.into())
            }
        };

        let center = 0.5 * (a + b);
        let half_length = 0.5 * (b - a);
        let abs_half_length = half_length.abs();

        let fc = sample(center)?;
        let mut result_gauss = 0.0;
        let mut result_kronrod = WGK[10] * fc;
        let mut result_abs = result_kronrod.abs();

        let mut fv1 = [0.0; 10];
        let mut fv2 = [0.0; 10];

        for (i, &x) in XGK[..10].iter().enumerate() {
            let abscissa = half_length * x;
            let f1 = sample(center - abscissa)?;
            let f2 = sample(center + abscissa)?;
            fv1[i] = f1;
            fv2[i] = f2;

            let sum = f1 + f2;
            result_kronrod += WGK[i] * sum;
            result_abs += WGK[i] * (f1.abs() + f2.abs());
            if i % 2 == 1 {
                result_gauss += WG[i / 2] * sum;
            }
        }

        let mean = 0.5 * result_kronrod;
        let mut result_asc = WGK[10] * (fc - mean).abs();
        for i in 0..10 {
            result_asc += WGK[i] * ((fv1[i] - mean).abs() + (fv2[i] - mean).abs());
        }

        let value = result_kronrod * half_length;
        result_abs *= abs_half_length;
        result_asc *= abs_half_length;

        let mut abs_error = ((result_kronrod - result_gauss) * half_length).abs();
        if result_asc != 0.0 && abs_error != 0.0 {
            abs_error = result_asc * (200.0 * abs_error / result_asc).powf(1.5).min(1.0);
        }
        if result_abs > f64::MIN_POSITIVE / (50.0 * f64::EPSILON) {
            abs_error = abs_error.max(50.0 * f64::EPSILON * result_abs);
        }

        Ok(Self {
            a,
            b,
            value,
            abs_error,
        })
    }
}

impl PartialEq for Segment {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Segment {}

impl PartialOrd for Segment {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Segment {
    fn cmp(&self, other: &Self) -> Ordering {
        self.abs_error.total_cmp(&other.abs_error)
    }
}
