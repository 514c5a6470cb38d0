use crate::math::matrix::Matrix;

/// A dataset provider: produces one `(input, target)` pair per call, with
/// fixed widths matching the network's first and last layers.
pub trait PairSource {
    fn next_pair(&mut self) -> (Matrix, Matrix);
}

/// Any closure returning a pair is a source.
impl<F> PairSource for F
where
    F: FnMut() -> (Matrix, Matrix),
{
    fn next_pair(&mut self) -> (Matrix, Matrix) {
        self()
    }
}

/// Draws `count` pairs from `source` into parallel input and target vectors,
/// ready to hand to `Network::train` or `train_loop`.
pub fn collect_pairs(source: &mut impl PairSource, count: usize) -> (Vec<Matrix>, Vec<Matrix>) {
    let mut inputs = Vec::with_capacity(count);
    let mut targets = Vec::with_capacity(count);
    for _ in 0..count {
        let (input, target) = source.next_pair();
        inputs.push(input);
        targets.push(target);
    }
    (inputs, targets)
}
