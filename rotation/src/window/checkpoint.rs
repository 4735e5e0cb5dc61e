/// Consumer of the per-window big-task total (the rotation decision).
pub trait RotationCheckpoint: Send + Sync {
    fn report(&self, big_task_total: u64);
}

impl<F> RotationCheckpoint for F
where
    F: Fn(u64) + Send + Sync,
{
    fn report(&self, big_task_total: u64) {
        self(big_task_total)
    }
}
