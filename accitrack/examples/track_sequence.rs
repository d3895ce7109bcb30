use accitrack::{AccidentTracker, Bbox, Detection, TrackerConfig};

fn main() {
    let mut tracker = AccidentTracker::new(TrackerConfig::default());

    // A box drifting right at 3px per frame, with a dropout at frames 6-7
    for frame in 1u64..=15 {
        let detections = if frame == 6 || frame == 7 {
            Vec::new()
        } else {
            let x = 10.0 + frame as f32 * 3.0;
            vec![Detection::new(Bbox::new(x, 20.0, x + 40.0, 60.0), 0.85)]
        };

        let update = tracker.track(&detections);

        for confirmed in &update.newly_confirmed {
            println!("frame {frame}: track {} confirmed", confirmed.id);
        }
        for track in &update.tracks {
            println!(
                "frame {frame}: track {} at ({:.1}, {:.1}) {}",
                track.id,
                track.bbox.center_x(),
                track.bbox.center_y(),
                if track.confirmed { "confirmed" } else { "tentative" }
            );
        }
    }
}
