use std::hint::black_box;
use std::time::Instant;

use drivescene_render::{DebugTextRenderer, Renderer, SceneView};
use drivescene_runtime::FrameScheduler;

/// Discards the frame so only the update stages are timed.
struct NullRenderer;

impl Renderer for NullRenderer {
    type Output = ();

    fn render(&self, scene: &SceneView<'_>) {
        black_box(scene.view);
    }
}

fn bench_ticks<R: Renderer>(label: &str, renderer: &R, frames: u64) {
    let mut scheduler = FrameScheduler::default();
    scheduler.input_mut().key_down("w");
    scheduler.input_mut().key_down("a");

    let start = Instant::now();
    let ran = scheduler.run(renderer, |report, output| {
        black_box(output);
        report.frame < frames
    });
    let elapsed = start.elapsed();
    let per_frame = elapsed / ran as u32;
    println!("  {label} ({ran} frames): {per_frame:?}/frame, total {elapsed:?}");
}

fn bench_mode_cycling(frames: u64) {
    let mut scheduler = FrameScheduler::default();
    scheduler.input_mut().key_down("w");

    let start = Instant::now();
    for i in 0..frames {
        let key = ["1", "2", "3"][(i / 60 % 3) as usize];
        scheduler.input_mut().key_down(key);
        black_box(scheduler.tick(&NullRenderer));
    }
    let elapsed = start.elapsed();
    println!(
        "  mode cycling ({frames} frames): {:?}/frame, total {elapsed:?}",
        elapsed / frames as u32
    );
}

fn main() {
    println!("=== Scheduler Benchmarks ===\n");

    println!("tick (null renderer):");
    for frames in [1_000, 10_000, 100_000] {
        bench_ticks("null", &NullRenderer, frames);
    }

    println!("\ntick (debug text renderer):");
    for frames in [1_000, 10_000] {
        bench_ticks("text", &DebugTextRenderer::new(), frames);
    }

    println!("\nmode cycling:");
    bench_mode_cycling(10_000);

    println!("\nDone.");
}
