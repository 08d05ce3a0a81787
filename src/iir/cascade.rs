use num_complex::Complex;
use num_traits::{AsPrimitive, Float, FloatConst};

use crate::{
    Inplace, Process, SplitInplace, SplitProcess,
    iir::{Biquad, DirectForm1},
};

/// Serial chain of biquads
///
/// Each stage owns one [`DirectForm1`] state. Stage `i` processes the output
/// of stage `i - 1` in the same buffer. Resetting clears all states and
/// keeps the coefficients. An empty cascade is the identity.
///
/// ```
/// # use dspbench::iir::*;
/// # use dspbench::Inplace;
/// let mut casc = Cascade::alternating_peaking(4, 48e3, 50.0, 0.3, 2.0);
/// let mut xy = [0.5; 16];
/// casc.inplace(&mut xy);
/// casc.reset();
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Cascade<T> {
    sections: Vec<Biquad<T>>,
    state: Vec<DirectForm1<T>>,
}

impl<T: Float> Default for Cascade<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<T: Float> FromIterator<Biquad<T>> for Cascade<T> {
    fn from_iter<I: IntoIterator<Item = Biquad<T>>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<T: Float> Cascade<T> {
    /// Build a cascade from stages with cleared states
    pub fn new(sections: Vec<Biquad<T>>) -> Self {
        let state = vec![DirectForm1::default(); sections.len()];
        Self { sections, state }
    }

    /// Number of stages
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Whether there are no stages
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Stage coefficients in processing order
    pub fn sections(&self) -> &[Biquad<T>] {
        &self.sections
    }

    /// Stage states in processing order
    pub fn state(&self) -> &[DirectForm1<T>] {
        &self.state
    }

    /// Clear the state of every stage
    pub fn reset(&mut self) {
        self.state.iter_mut().for_each(DirectForm1::reset);
    }
}

impl<T> Cascade<T>
where
    T: 'static + Float + FloatConst,
    f64: AsPrimitive<T>,
{
    /// Peaking equalizers with alternating gain sign
    ///
    /// Stage `i` has `+gain_db` for even `i` and `-gain_db` for odd `i`,
    /// all at the same center frequency and Q.
    ///
    /// # Arguments
    /// * `count`: Number of stages
    /// * `sample_rate`: Sample rate
    /// * `center_frequency`: Peak frequency, same units as `sample_rate`
    /// * `q`: Quality factor
    /// * `gain_db`: Gain of the first stage in dB
    pub fn alternating_peaking(
        count: usize,
        sample_rate: T,
        center_frequency: T,
        q: T,
        gain_db: T,
    ) -> Self {
        (0..count)
            .map(|i| {
                let g = if i % 2 == 0 { gain_db } else { -gain_db };
                Biquad::peaking_eq(sample_rate, center_frequency, q, g)
            })
            .collect()
    }
}

impl<T: Float + FloatConst> Cascade<T> {
    /// Combined complex frequency response
    ///
    /// # Arguments
    /// * `f`: Relative frequency in units of the sample rate, `0.5` is Nyquist.
    pub fn response(&self, f: T) -> Complex<T> {
        self.sections
            .iter()
            .fold(Complex::from(T::one()), |h, s| h * s.response(f))
    }
}

impl<T: Float> Process<T> for Cascade<T> {
    fn process(&mut self, x: T) -> T {
        self.sections[..].process(&mut self.state[..], x)
    }

    fn block(&mut self, x: &[T], y: &mut [T]) {
        self.sections[..].block(&mut self.state[..], x, y)
    }
}

impl<T: Float> Inplace<T> for Cascade<T> {
    fn inplace(&mut self, xy: &mut [T]) {
        self.sections[..].inplace(&mut self.state[..], xy)
    }
}
