//! Console walkthrough of the walk/greet routine.
//!
//! Drives a figure with a fixed 60 Hz timestep and prints the resolved
//! bone placements every time the animation state changes. Run with
//! `RUST_LOG=debug` to also see the sequencer's transition log.

extern crate cgmath;
extern crate env_logger;
extern crate manikin;

use cgmath::{Matrix4, SquareMatrix};
use manikin::{color, CycleLimits, Figure, State};

/// Everything the frame loop touches, threaded explicitly.
struct Context {
    figure: Figure,
    elapsed: f32,
    last_state: State,
}

fn print_figure(context: &Context) {
    println!("[{:6.2}s] {}", context.elapsed, context.figure.state_str());
    let root: [[f32; 4]; 4] = Matrix4::identity().into();
    for instance in context.figure.resolve(root) {
        let columns: [[f32; 4]; 4] = instance.world.into();
        let position = columns[3];
        let rgb = color::to_linear_rgb(instance.color);
        println!(
            "  {:10} at ({:6.2}, {:6.2}, {:6.2})  rgb({:.2}, {:.2}, {:.2})",
            instance.bone.name(),
            position[0], position[1], position[2],
            rgb[0], rgb[1], rgb[2],
        );
    }
}

fn main() {
    env_logger::init().unwrap();

    let mut context = Context {
        figure: Figure::with_limits(CycleLimits { walk: 2, greet: 2 }),
        elapsed: 0.0,
        last_state: State::Walking,
    };
    print_figure(&context);

    let dt = 1.0 / 60.0;
    while context.elapsed < 20.0 {
        context.figure.update(dt);
        context.elapsed += dt;
        if context.figure.state() != context.last_state {
            context.last_state = context.figure.state();
            print_figure(&context);
        }
    }
}
