use super::{Real, Seconds};

/// A local maximum of a series: its time offset and value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Peak {
    pub(crate) time: Seconds,
    pub(crate) value: Real,
}

/// A stateful detector fed one `(time, value)` point at a time.
pub(crate) trait Detector: Default + Clone {
    type EventType;

    fn signal(&mut self, time: Seconds, value: Real) -> Option<Self::EventType>;

    /// Called once after the last point; a detector may emit a final
    /// event here.
    fn finish(&mut self) -> Option<Self::EventType>;
}

/// Emits strict local maxima.
///
/// A peak is a point greater than both neighbours. A plateau counts as
/// one peak, represented by its first index, and only when it was
/// entered by a strict rise and left by a strict fall. The first and
/// last points of a series are never peaks, so `finish` emits nothing.
#[derive(Default, Debug, Clone)]
pub(crate) struct PeakDetector {
    prev: Option<Real>,
    // Start of the current top level, kept only while the last strict
    // change was a rise.
    candidate: Option<Peak>,
}

impl Detector for PeakDetector {
    type EventType = Peak;

    fn signal(&mut self, time: Seconds, value: Real) -> Option<Peak> {
        let Some(prev) = self.prev.replace(value) else {
            return None;
        };
        if value > prev {
            self.candidate = Some(Peak { time, value });
            None
        } else if value < prev {
            self.candidate.take()
        } else {
            None
        }
    }

    fn finish(&mut self) -> Option<Peak> {
        None
    }
}

/// Lazily applies a [`Detector`] to a `(time, value)` stream.
/// Restartable when the source iterator is `Clone`.
#[derive(Clone)]
pub(crate) struct EventIter<I, D>
where
    I: Iterator<Item = (Seconds, Real)>,
    D: Detector,
{
    source: I,
    detector: D,
    finished: bool,
}

impl<I, D> Iterator for EventIter<I, D>
where
    I: Iterator<Item = (Seconds, Real)>,
    D: Detector,
{
    type Item = D::EventType;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.source.next() {
                Some((time, value)) => {
                    if let Some(event) = self.detector.signal(time, value) {
                        return Some(event);
                    }
                }
                None => {
                    if self.finished {
                        return None;
                    }
                    self.finished = true;
                    return self.detector.finish();
                }
            }
        }
    }
}

pub(crate) trait EventFilter<I, D>
where
    I: Iterator<Item = (Seconds, Real)>,
    D: Detector,
{
    fn events(self, detector: D) -> EventIter<I, D>;
}

impl<I, D> EventFilter<I, D> for I
where
    I: Iterator<Item = (Seconds, Real)>,
    D: Detector,
{
    fn events(self, detector: D) -> EventIter<I, D> {
        EventIter {
            source: self,
            detector,
            finished: false,
        }
    }
}
