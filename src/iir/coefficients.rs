use num_traits::{AsPrimitive, Float, FloatConst};
use serde::{Deserialize, Serialize};

/// Standard audio biquad filter builder
///
/// <https://www.w3.org/TR/audio-eq-cookbook/>
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Filter<T> {
    /// Angular critical frequency (in units of sampling frequency),
    /// `frequency=π` is Nyquist.
    pub frequency: T,
    /// Q, `1/sqrt(2)` for critical
    pub q: T,
    /// Linear peak gain at the critical frequency
    pub shelf: T,
}

impl<T: Float + FloatConst> Default for Filter<T> {
    fn default() -> Self {
        Self {
            frequency: T::zero(),
            q: T::SQRT_2().recip(),
            shelf: T::one(),
        }
    }
}

impl<T> Filter<T>
where
    T: 'static + Float + FloatConst,
    f64: AsPrimitive<T>,
{
    /// Set crititcal frequency from absolute units.
    ///
    /// # Arguments
    /// * `critical_frequency`: "Center" frequency
    ///   in the same units as `sample_frequency`
    /// * `sample_frequency`: The sample frequency in the same units as `critical_frequency`.
    pub fn frequency(&mut self, critical_frequency: T, sample_frequency: T) -> &mut Self {
        self.critical_frequency(critical_frequency / sample_frequency)
    }

    /// Set relative critical frequency
    ///
    /// # Arguments
    /// * `f0`: Relative critical frequency in units of the sample frequency.
    ///   Must be `0 <= f0 <= 0.5`.
    pub fn critical_frequency(&mut self, f0: T) -> &mut Self {
        self.angular_critical_frequency(T::TAU() * f0)
    }

    /// Set relative critical angular frequency
    ///
    /// # Arguments
    /// * `w0`: Relative critical angular frequency.
    ///   Must be `0 <= w0 <= π`. Defaults to `0.0`.
    pub fn angular_critical_frequency(&mut self, w0: T) -> &mut Self {
        self.frequency = w0;
        self
    }

    /// Set Q parameter of the filter
    ///
    /// The "steepness"/"narrowness" of the filter transition.
    ///
    /// # Arguments
    /// * `q`: Q parameter. Must be positive.
    pub fn q(&mut self, q: T) -> &mut Self {
        self.q = q;
        self
    }

    /// Set linear peak gain
    ///
    /// # Arguments
    /// * `a`: Linear gain at the critical frequency. Defaults to `1.0`.
    pub fn shelf(&mut self, a: T) -> &mut Self {
        self.shelf = a;
        self
    }

    /// Set peak gain in dB
    ///
    /// # Arguments
    /// * `a_db`: Gain at the critical frequency in dB. Defaults to `0.0`.
    pub fn shelf_db(&mut self, a_db: T) -> &mut Self {
        self.shelf(10.0.as_().powf(a_db / 20.0.as_()))
    }

    /// Get (cos(w0), alpha=sin(w0)/(2*q))
    fn fcos_alpha(&self) -> (T, T) {
        let (fsin, fcos) = self.frequency.sin_cos();
        (fcos, fsin / (2.0.as_() * self.q))
    }

    /// A peaking/dip filter
    ///
    /// Has `shelf` gain at the critical frequency and unity gain elsewhere.
    ///
    /// Returns the unnormalized `[[b0, b1, b2], [a0, a1, a2]]`.
    /// With `A = sqrt(shelf) = 10^(gain_db/40)` and `alpha = sin(w0)/(2*q)`:
    /// `b = [1 + alpha*A, -2*cos(w0), 1 - alpha*A]`,
    /// `a = [1 + alpha/A, -2*cos(w0), 1 - alpha/A]`.
    ///
    /// ```
    /// use dspbench::iir::*;
    /// let ba = Filter::default()
    ///     .frequency(1000.0, 48e3)
    ///     .q(5.0)
    ///     .shelf_db(3.0)
    ///     .peaking();
    /// assert_eq!(ba[0][1], ba[1][1]);
    /// ```
    pub fn peaking(&self) -> [[T; 3]; 2] {
        let (fcos, alpha) = self.fcos_alpha();
        let s = self.shelf.sqrt();
        let f2 = (-2.0).as_() * fcos;
        [
            [T::one() + alpha * s, f2, T::one() - alpha * s],
            [T::one() + alpha / s, f2, T::one() - alpha / s],
        ]
    }
}
