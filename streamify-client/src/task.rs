use threadpool::ThreadPool;

pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Where blocking backend calls run.
pub trait Spawner {
    fn spawn(&self, task: Task);
}

impl Spawner for ThreadPool {
    fn spawn(&self, task: Task) {
        self.execute(task);
    }
}

/// Runs tasks on the calling thread.  Results still arrive through the event
/// channel, so ordering against later commands stays observable.
pub struct Inline;

impl Spawner for Inline {
    fn spawn(&self, task: Task) {
        task();
    }
}

pub fn worker_pool(threads: usize) -> ThreadPool {
    ThreadPool::with_name("backend".into(), threads.max(1))
}
