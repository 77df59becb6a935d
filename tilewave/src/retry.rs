use crate::{error::Contradiction, run::Run, wave::Wave};
use rand::Rng;

/// How a run responds to contradictions. Every new attempt starts from a
/// freshly reset wave.
pub trait Retry: private::Sealed {
    type Return;
    fn retry<'a, R>(&mut self, run: Run<'a>, rng: &mut R) -> Self::Return
    where
        R: Rng;
}

/// Retry until the wave collapses. May never return if the sample's patterns
/// cannot tile the output.
#[derive(Debug, Clone, Copy)]
pub struct Forever;

impl Retry for Forever {
    type Return = Wave;
    fn retry<'a, R>(&mut self, mut run: Run<'a>, rng: &mut R) -> Self::Return
    where
        R: Rng,
    {
        let mut attempt = 0usize;
        loop {
            match run.collapse(rng) {
                Ok(()) => return run.into_wave(),
                Err(contradiction) => {
                    attempt += 1;
                    log::debug!("attempt {} failed: {}", attempt, contradiction);
                    run.reset();
                }
            }
        }
    }
}

/// Retry at most this many extra times, returning the last contradiction if
/// every attempt fails.
#[derive(Debug, Clone, Copy)]
pub struct NumTimes(pub usize);

impl Retry for NumTimes {
    type Return = Result<Wave, Contradiction>;
    fn retry<'a, R>(&mut self, mut run: Run<'a>, rng: &mut R) -> Self::Return
    where
        R: Rng,
    {
        loop {
            match run.collapse(rng) {
                Ok(()) => return Ok(run.into_wave()),
                Err(e) => {
                    if self.0 == 0 {
                        log::warn!("giving up: {}", e);
                        return Err(e);
                    } else {
                        log::debug!("retrying ({} left): {}", self.0, e);
                        self.0 -= 1;
                        run.reset();
                    }
                }
            }
        }
    }
}

/// Like `NumTimes`, but every attempt runs at once on the rayon thread pool.
/// Each attempt is seeded from `rng` up front, and the first success in seed
/// order is returned, so the result depends only on `rng`.
#[cfg(feature = "parallel")]
#[derive(Debug, Clone, Copy)]
pub struct ParNumTimes(pub usize);

#[cfg(feature = "parallel")]
impl Retry for ParNumTimes {
    type Return = Result<Wave, Contradiction>;
    fn retry<'a, R>(&mut self, run: Run<'a>, rng: &mut R) -> Self::Return
    where
        R: Rng,
    {
        use rand::SeedableRng;
        use rand_xorshift::XorShiftRng;
        use rayon::prelude::*;

        let seeds = (0..=self.0).map(|_| rng.gen::<u64>()).collect::<Vec<_>>();
        let attempts = seeds
            .par_iter()
            .map(|&seed| {
                let mut run = run.clone();
                run.reset();
                let mut rng = XorShiftRng::seed_from_u64(seed);
                run.collapse(&mut rng).map(|()| run.into_wave())
            })
            .collect::<Vec<_>>();
        let mut last_error = None;
        for attempt in attempts {
            match attempt {
                Ok(wave) => return Ok(wave),
                Err(e) => last_error = Some(e),
            }
        }
        match last_error {
            Some(e) => {
                log::warn!("all {} attempts failed, last: {}", seeds.len(), e);
                Err(e)
            }
            None => unreachable!("at least one attempt is always made"),
        }
    }
}

mod private {
    use super::*;

    pub trait Sealed {}

    impl Sealed for Forever {}
    impl Sealed for NumTimes {}
    #[cfg(feature = "parallel")]
    impl Sealed for ParNumTimes {}
}
