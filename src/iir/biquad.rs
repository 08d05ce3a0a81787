use num_complex::Complex;
use num_traits::{AsPrimitive, Float, FloatConst};
use serde::{Deserialize, Serialize};

use crate::{SplitInplace, SplitProcess, iir::Filter};

/// Biquad IIR filter coefficients
///
/// `[b0, b1, b2, a1, a2]` normalized such that `a0 = 1`, implementing
/// `H(z) = (b0 + b1*z^-1 + b2*z^-2)/(1 + a1*z^-1 + a2*z^-2)`.
///
/// The coefficients are decoupled from the filter state [`DirectForm1`].
/// Processing never modifies them, resetting a filter means resetting its state.
///
/// ```
/// # use dspbench::iir::*;
/// # use dspbench::SplitProcess;
/// let k = Biquad::proportional(3.0);
/// let mut xy = DirectForm1::default();
/// assert_eq!(k.process(&mut xy, 2.0), 6.0);
/// assert_eq!(xy.xy, [2.0, 0.0, 6.0, 0.0]);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Biquad<T> {
    ba: [T; 5],
}

impl<T> From<[T; 5]> for Biquad<T> {
    fn from(ba: [T; 5]) -> Self {
        Self { ba }
    }
}

/// Normalize `[[b0, b1, b2], [a0, a1, a2]]` by `a0`.
impl<T: Float> From<&[[T; 3]; 2]> for Biquad<T> {
    fn from(ba: &[[T; 3]; 2]) -> Self {
        let a0 = ba[1][0];
        Self::from([
            ba[0][0] / a0,
            ba[0][1] / a0,
            ba[0][2] / a0,
            ba[1][1] / a0,
            ba[1][2] / a0,
        ])
    }
}

impl<T: Float> From<[[T; 3]; 2]> for Biquad<T> {
    fn from(ba: [[T; 3]; 2]) -> Self {
        Self::from(&ba)
    }
}

impl<T: Float> Biquad<T> {
    /// A filter with the given proportional gain at all frequencies
    pub fn proportional(k: T) -> Self {
        Self::from([k, T::zero(), T::zero(), T::zero(), T::zero()])
    }

    /// Filter coefficients `[b0, b1, b2, a1, a2]`
    pub fn ba(&self) -> &[T; 5] {
        &self.ba
    }

    /// Compute the overall (DC feed-forward) gain.
    ///
    /// # Returns
    /// The sum of the `b` feed-forward coefficients.
    pub fn forward_gain(&self) -> T {
        self.ba[0] + self.ba[1] + self.ba[2]
    }

    /// Direct Form 1 update
    ///
    /// Ingest a new input value into the filter, update the filter state, and
    /// return the new output. Only the state `xy` is modified.
    ///
    /// # Arguments
    /// * `xy` - Current filter state.
    ///   On entry: `[x1, x2, y1, y2]`
    ///   On exit:  `[x0, x1, y0, y1]`
    /// * `x0` - New input.
    ///
    /// # Returns
    /// The new output `y0 = b0*x0 + b1*x1 + b2*x2 - a1*y1 - a2*y2`
    #[inline]
    pub fn update(&self, xy: &mut [T; 4], x0: T) -> T {
        let ba = &self.ba;
        let y0 = ba[0] * x0 + ba[1] * xy[0] + ba[2] * xy[1] - ba[3] * xy[2] - ba[4] * xy[3];
        *xy = [x0, xy[0], y0, xy[2]];
        y0
    }
}

impl<T: Float + FloatConst> Biquad<T> {
    /// Complex frequency response
    ///
    /// # Arguments
    /// * `f`: Relative frequency in units of the sample rate, `0.5` is Nyquist.
    pub fn response(&self, f: T) -> Complex<T> {
        let z = Complex::from_polar(T::one(), -T::TAU() * f);
        let ba = &self.ba;
        let b = (Complex::from(ba[2]) * z + ba[1]) * z + ba[0];
        let a = (Complex::from(ba[4]) * z + ba[3]) * z + T::one();
        b / a
    }
}

impl<T> Biquad<T>
where
    T: 'static + Float + FloatConst,
    f64: AsPrimitive<T>,
{
    /// Peaking equalizer
    ///
    /// Gain `gain_db` at `center_frequency`, unity far from it.
    ///
    /// No attempt is made to detect non-positive `q`, a zero sample rate, or
    /// non-finite inputs. These lead to NaNs or infinities in the coefficients.
    ///
    /// ```
    /// # use dspbench::iir::*;
    /// let bq = Biquad::<f64>::peaking_eq(48e3, 1e3, 0.7, 6.0);
    /// let g = bq.response(1e3 / 48e3).norm();
    /// assert!((20.0 * g.log10() - 6.0).abs() < 1e-9);
    /// ```
    ///
    /// # Arguments
    /// * `sample_rate`: Sample rate
    /// * `center_frequency`: Peak frequency, same units as `sample_rate`
    /// * `q`: Quality factor
    /// * `gain_db`: Peak gain in dB, negative for a dip
    pub fn peaking_eq(sample_rate: T, center_frequency: T, q: T, gain_db: T) -> Self {
        Filter::default()
            .frequency(center_frequency, sample_rate)
            .q(q)
            .shelf_db(gain_db)
            .peaking()
            .into()
    }
}

/// Direct Form 1 filter state
///
/// `[x1, x2, y1, y2]`, the two previous inputs and outputs.
/// Lower indices correspond to more recent samples.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DirectForm1<T> {
    /// X,Y state
    pub xy: [T; 4],
}

impl<T: Float> Default for DirectForm1<T> {
    fn default() -> Self {
        Self {
            xy: [T::zero(); 4],
        }
    }
}

impl<T: Float> DirectForm1<T> {
    /// Clear the input and output history
    pub fn reset(&mut self) {
        self.xy = [T::zero(); 4];
    }
}

impl<T: Float> SplitProcess<T, T, DirectForm1<T>> for Biquad<T> {
    #[inline]
    fn process(&self, state: &mut DirectForm1<T>, x0: T) -> T {
        self.update(&mut state.xy, x0)
    }
}

impl<T: Float> SplitInplace<T, DirectForm1<T>> for Biquad<T> {
    fn inplace(&self, state: &mut DirectForm1<T>, xy: &mut [T]) {
        for x in xy.iter_mut() {
            *x = self.update(&mut state.xy, *x);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::testing::*;
    use quickcheck_macros::quickcheck;
    use rand::{prelude::*, rngs::StdRng};

    fn eq50(gain_db: f64) -> Biquad<f64> {
        Biquad::peaking_eq(48e3, 50.0, 0.3, gain_db)
    }

    #[test]
    fn coefficients() {
        let (fs, f0, q, db) = (48e3, 50.0, 0.3, 2.0);
        let bq = Biquad::peaking_eq(fs, f0, q, db);
        let a = 10f64.powf(db / 40.0);
        let w = 2.0 * core::f64::consts::PI * f0 / fs;
        let alpha = w.sin() / (2.0 * q);
        let a0 = 1.0 + alpha / a;
        let want = [
            (1.0 + alpha * a) / a0,
            (-2.0 * w.cos()) / a0,
            (1.0 - alpha * a) / a0,
            (-2.0 * w.cos()) / a0,
            (1.0 - alpha / a) / a0,
        ];
        assert!(allclose(bq.ba(), &want, 1e-14, 0.0), "{bq:?} != {want:?}");
        assert_eq!(bq.ba()[1], bq.ba()[3]);
    }

    #[test]
    fn impulse() {
        let bq = eq50(2.0);
        let [b0, b1, b2, a1, a2] = *bq.ba();
        let mut xy = vec![0.0; 8];
        xy[0] = 1.0;
        bq.inplace(&mut DirectForm1::default(), &mut xy);
        let mut want = vec![b0, b1 - a1 * b0];
        want.push(b2 - a1 * want[1] - a2 * want[0]);
        for i in 3..xy.len() {
            want.push(-a1 * want[i - 1] - a2 * want[i - 2]);
        }
        assert!(allclose(&xy, &want, 1e-12, 0.0), "{xy:?} != {want:?}");
    }

    #[test]
    fn reset() {
        let bq = eq50(-2.0);
        let mut state = DirectForm1::default();
        let mut xy = [0.3, -0.1, 0.5];
        bq.inplace(&mut state, &mut xy);
        assert_ne!(state, DirectForm1::default());
        state.reset();
        assert_eq!(state, DirectForm1::default());
        assert_eq!(bq, eq50(-2.0));
    }

    #[quickcheck]
    fn continuity(n1: u8, n2: u8, seed: u64) -> bool {
        let bq = eq50(2.0);
        let mut rng = StdRng::seed_from_u64(seed);
        let x: Vec<f64> = (0..n1 as usize + n2 as usize)
            .map(|_| rng.random_range(-1.0..1.0))
            .collect();
        let mut whole = x.clone();
        bq.inplace(&mut DirectForm1::default(), &mut whole);
        let mut split = x;
        let mut state = DirectForm1::default();
        let (a, b) = split.split_at_mut(n1 as usize);
        bq.inplace(&mut state, a);
        bq.inplace(&mut state, b);
        whole == split
    }

    #[test]
    fn block_matches_inplace() {
        let bq = eq50(2.0);
        let x: Vec<f64> = (0..64).map(|i| (i as f64 * 0.1).sin()).collect();
        let mut y = vec![0.0; x.len()];
        bq.block(&mut DirectForm1::default(), &x, &mut y);
        let mut xy = x.clone();
        bq.inplace(&mut DirectForm1::default(), &mut xy);
        assert_eq!(y, xy);
    }

    #[test]
    fn response() {
        let bq = eq50(2.0);
        assert!(isclose(bq.response(0.0).norm(), 1.0, 1e-12, 0.0));
        assert!(isclose(bq.response(0.5).norm(), 1.0, 1e-12, 0.0));
        let g = 20.0 * bq.response(50.0 / 48e3).norm().log10();
        assert!(isclose(g, 2.0, 1e-9, 0.0), "{g}");
        // Unity DC gain
        assert!(isclose(
            bq.forward_gain(),
            1.0 + bq.ba()[3] + bq.ba()[4],
            0.0,
            1e-14
        ));
    }

    #[test]
    fn step_settles() {
        // DC gain is unity: a constant input passes unchanged once settled
        let bq = Biquad::peaking_eq(48e3, 1e3, 0.7, 6.0);
        let mut state = DirectForm1::default();
        let mut xy = vec![0.5f32; 4096];
        bq.inplace(&mut state, &mut xy);
        assert!((xy[4095] - 0.5).abs() < 1e-4);
    }
}
