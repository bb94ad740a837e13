use super::*;
use std::sync::{
    atomic::{AtomicU32, Ordering},
    Arc,
};

fn counting_task(period: Duration, stop_after: u32) -> (RepeatingTask, Arc<AtomicU32>) {
    let count = Arc::new(AtomicU32::new(0));
    let seen = Arc::clone(&count);
    let task = RepeatingTask::spawn(period, move || {
        let seen = Arc::clone(&seen);
        async move {
            let n = seen.fetch_add(1, Ordering::SeqCst) + 1;
            if n >= stop_after {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        }
    });
    (task, count)
}

#[tokio::test(start_paused = true)]
async fn first_step_runs_one_period_after_spawn() {
    let (_task, count) = counting_task(Duration::from_millis(100), u32::MAX);

    time::sleep(Duration::from_millis(50)).await;
    assert_eq!(count.load(Ordering::SeqCst), 0);

    time::sleep(Duration::from_millis(100)).await;
    assert_eq!(count.load(Ordering::SeqCst), 1);

    time::sleep(Duration::from_millis(200)).await;
    assert_eq!(count.load(Ordering::SeqCst), 3);
}

#[tokio::test(start_paused = true)]
async fn break_ends_the_loop() {
    let (task, count) = counting_task(Duration::from_millis(10), 4);

    time::sleep(Duration::from_millis(500)).await;
    assert_eq!(count.load(Ordering::SeqCst), 4);
    assert!(task.is_finished());
}

#[tokio::test(start_paused = true)]
async fn cancel_and_drop_stop_further_steps() {
    let (task, cancelled) = counting_task(Duration::from_millis(10), u32::MAX);
    time::sleep(Duration::from_millis(25)).await;
    task.cancel();
    let at_cancel = cancelled.load(Ordering::SeqCst);
    time::sleep(Duration::from_millis(200)).await;
    assert_eq!(cancelled.load(Ordering::SeqCst), at_cancel);

    let (task, dropped) = counting_task(Duration::from_millis(10), u32::MAX);
    time::sleep(Duration::from_millis(25)).await;
    drop(task);
    let at_drop = dropped.load(Ordering::SeqCst);
    time::sleep(Duration::from_millis(200)).await;
    assert_eq!(dropped.load(Ordering::SeqCst), at_drop);
}
