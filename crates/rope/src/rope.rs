//! The rope aggregate: owns its segments and repositions them every frame.

use engine_core::{ModelId, ObjectHandle, ScriptHost};
use glam::Vec3;

use crate::attachment::{resolve_anchor, Attachment};
use crate::builder::{build_chain, hang_position};
use crate::config::RopeConfig;
use crate::deployment::{Deployment, DeploymentState, SettleTolerance};
use crate::error::RopeError;
use crate::wind::Wind;

/// What a call to [`Rope::process`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Segments were repositioned.
    Updated,
    /// The attachment was gone; nothing moved.
    Skipped,
}

/// A chain of spawned segments hanging from an anchor to the ground.
///
/// Positions come straight from a closed-form target per segment (anchor drop,
/// wind sway, attachment offset) blended by the eased deployment progress.
/// The host calls [`Rope::process`] once per tick and [`Rope::delete`] when done.
#[derive(Debug)]
pub struct Rope {
    /// Fixed anchor, or the last position the attachment resolved to.
    anchor: Vec3,
    /// Anchor used by the most recent updated frame (includes overrides).
    resolved_anchor: Vec3,
    model: ModelId,
    extent: Vec3,
    segments: Vec<ObjectHandle>,
    attachment: Attachment,
    attach_offset: Vec3,
    deployment: Deployment,
    wind: Wind,
    easing_exponent: f32,
    show_debug_points: bool,
    tolerance: SettleTolerance,
}

impl Rope {
    /// Build a rope with default tunables.
    pub fn create<H: ScriptHost>(
        host: &mut H,
        anchor: Vec3,
        starting_state: DeploymentState,
        model_name: &str,
    ) -> Result<Self, RopeError> {
        Self::create_with_config(host, anchor, starting_state, model_name, &RopeConfig::default())
    }

    pub fn create_with_config<H: ScriptHost>(
        host: &mut H,
        anchor: Vec3,
        starting_state: DeploymentState,
        model_name: &str,
        config: &RopeConfig,
    ) -> Result<Self, RopeError> {
        let chain = build_chain(host, anchor, model_name)?;
        log::info!(
            "Rope of {} segments at ({:.1}, {:.1}, {:.1}), state {:?}",
            chain.segments.len(),
            anchor.x,
            anchor.y,
            anchor.z,
            starting_state
        );

        let mut wind = Wind::new(config.wind_frequency, config.wind_amplitude);
        wind.wrap = config.wrap_wind_phase;

        Ok(Self {
            anchor,
            resolved_anchor: anchor,
            model: chain.model,
            extent: chain.extent,
            segments: chain.segments,
            attachment: Attachment::None,
            attach_offset: Vec3::ZERO,
            deployment: Deployment::new(starting_state),
            wind,
            easing_exponent: config.easing_exponent,
            show_debug_points: config.show_debug_points,
            tolerance: SettleTolerance {
                deployed: config.deployed_tolerance,
                retracted: config.retracted_tolerance,
            },
        })
    }

    /// Advance one frame. `anchor_override`, when given, is used as the anchor
    /// for this call only, ahead of both the fixed anchor and any attachment.
    pub fn process<H: ScriptHost>(
        &mut self,
        host: &mut H,
        dt: f32,
        anchor_override: Option<Vec3>,
    ) -> FrameOutcome {
        let Some(anchor) = resolve_anchor(&*host, self.attachment, self.anchor, anchor_override) else {
            log::trace!("Attachment {:?} lost, holding rope", self.attachment);
            return FrameOutcome::Skipped;
        };
        if anchor_override.is_none() {
            self.anchor = anchor;
        }
        self.resolved_anchor = anchor;

        self.wind.advance();
        self.deployment.advance(dt);

        let t = self.deployment.interpolation_factor(self.easing_exponent);
        let retracted = self.retracted_point();
        for (index, &segment) in self.segments.iter().enumerate() {
            let target = self.deployed_target(index);
            let position = retracted.lerp(target, t);
            host.set_object_position(segment, position);
            if self.show_debug_points {
                host.draw_marker(position);
            }
        }

        self.settle(&*host);
        FrameOutcome::Updated
    }

    /// Host tick without an anchor override.
    pub fn update<H: ScriptHost>(&mut self, host: &mut H, dt: f32) -> FrameOutcome {
        self.process(host, dt, None)
    }

    fn settle<H: ScriptHost>(&mut self, host: &H) {
        if !self.deployment.state().is_transient() {
            return;
        }
        let Some(&last) = self.segments.last() else {
            return;
        };
        let last_index = self.segments.len() - 1;
        let target = self.deployed_target(last_index);
        let retracted = self.retracted_point();
        let current = host.object_position(last).unwrap_or(target);
        if let Some(state) = self.deployment.settle(current, target, retracted, self.tolerance) {
            log::debug!("Rope settled: {:?}", state);
        }
    }

    /// Release every segment. Consumes the rope; returns how many were destroyed.
    pub fn delete<H: ScriptHost>(mut self, host: &mut H) -> usize {
        let segments = std::mem::take(&mut self.segments);
        let count = segments.len();
        for segment in segments {
            host.destroy_object(segment);
        }
        log::info!("Rope deleted ({} segments)", count);
        count
    }

    pub fn start_deploying(&mut self) {
        self.deployment.start_deploying();
    }

    pub fn start_undeploying(&mut self) {
        self.deployment.start_undeploying();
    }

    pub fn set_attachment(&mut self, attachment: Attachment) {
        self.attachment = attachment;
    }

    pub fn attach_to_vehicle(&mut self, vehicle: ObjectHandle) {
        self.set_attachment(Attachment::Vehicle(vehicle));
    }

    pub fn attach_to_character(&mut self, character: ObjectHandle) {
        self.set_attachment(Attachment::Character(character));
    }

    /// Stop following the attached entity. The anchor stays where it was last resolved.
    pub fn clear_attachment(&mut self) {
        self.attachment = Attachment::None;
    }

    /// Offset added to every segment's deployed target.
    pub fn set_attach_offset(&mut self, offset: Vec3) {
        self.attach_offset = offset;
    }

    pub fn set_wind(&mut self, frequency: f32, amplitude: f32) {
        self.wind.frequency = frequency;
        self.wind.amplitude = amplitude;
    }

    pub fn set_easing_exponent(&mut self, exponent: f32) {
        self.easing_exponent = exponent;
    }

    pub fn set_show_debug_points(&mut self, show: bool) {
        self.show_debug_points = show;
    }

    /// Fully deployed position of segment `index` for the last resolved anchor.
    pub fn deployed_target(&self, index: usize) -> Vec3 {
        hang_position(self.resolved_anchor, self.extent.z, index) + self.wind.offset(index) + self.attach_offset
    }

    /// Where every segment collapses to when fully undeployed.
    pub fn retracted_point(&self) -> Vec3 {
        hang_position(self.resolved_anchor, self.extent.z, 0)
    }

    pub fn anchor(&self) -> Vec3 {
        self.anchor
    }

    pub fn resolved_anchor(&self) -> Vec3 {
        self.resolved_anchor
    }

    pub fn segments(&self) -> &[ObjectHandle] {
        &self.segments
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    pub fn segment_extent(&self) -> Vec3 {
        self.extent
    }

    pub fn model(&self) -> ModelId {
        self.model
    }

    pub fn state(&self) -> DeploymentState {
        self.deployment.state()
    }

    pub fn progress(&self) -> f32 {
        self.deployment.progress()
    }

    /// True when no deploy/undeploy animation is running.
    pub fn is_settled(&self) -> bool {
        !self.deployment.state().is_transient()
    }

    pub fn wind_phase(&self) -> f32 {
        self.wind.phase
    }

    pub fn attachment(&self) -> Attachment {
        self.attachment
    }

    pub fn attach_offset(&self) -> Vec3 {
        self.attach_offset
    }
}

impl Drop for Rope {
    fn drop(&mut self) {
        if !self.segments.is_empty() {
            log::warn!(
                "Rope dropped without delete(); {} segments left in the world",
                self.segments.len()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_core::{ModelCatalog, ModelEntry, ModelStreaming, SandboxWorld, WorldObjects};

    const LINK: &str = "prop_chain_link";

    fn world(ground: f32) -> SandboxWorld {
        let catalog = ModelCatalog::from_entries(vec![ModelEntry {
            name: LINK.into(),
            extent: Vec3::new(0.2, 0.2, 2.0),
        }])
        .unwrap();
        SandboxWorld::new(catalog, ground)
    }

    fn calm() -> RopeConfig {
        RopeConfig {
            wind_amplitude: 0.0,
            ..Default::default()
        }
    }

    fn positions(world: &SandboxWorld, rope: &Rope) -> Vec<Vec3> {
        rope.segments()
            .iter()
            .map(|&s| world.object_position(s).unwrap())
            .collect()
    }

    fn last_position(world: &SandboxWorld, rope: &Rope) -> Vec3 {
        world.object_position(*rope.segments().last().unwrap()).unwrap()
    }

    #[test]
    fn scenario_fifty_metre_drop() {
        let mut world = world(0.0);
        let rope = Rope::create(&mut world, Vec3::new(0.0, 0.0, 50.0), DeploymentState::Instant, LINK).unwrap();
        assert!((24..=25).contains(&rope.segment_count()));
        let p = positions(&world, &rope);
        assert!((p[0].z - 48.0).abs() < 1e-4);
        assert!(p.last().unwrap().z < 2.5);
        assert_eq!(rope.state(), DeploymentState::Instant);
        rope.delete(&mut world);
    }

    #[test]
    fn scenario_anchor_too_low() {
        let mut world = world(0.0);
        let err = Rope::create(&mut world, Vec3::new(0.0, 0.0, 1.0), DeploymentState::Instant, LINK).unwrap_err();
        assert!(matches!(err, RopeError::InvalidAnchor { .. }));
        assert_eq!(world.object_count(), 0);
        assert_eq!(world.pinned_models().count(), 0);
        assert!(!world.is_model_resident(ModelId::from_name(LINK)));
    }

    #[test]
    fn deployed_positions_follow_target_formula() {
        let mut world = world(0.0);
        let anchor = Vec3::new(4.0, -2.0, 30.0);
        let mut rope =
            Rope::create_with_config(&mut world, anchor, DeploymentState::Deployed, LINK, &calm()).unwrap();
        assert_eq!(rope.update(&mut world, 0.016), FrameOutcome::Updated);
        for (i, p) in positions(&world, &rope).into_iter().enumerate() {
            let expected = anchor.z - 2.0 * (i as f32 + 1.0);
            assert!((p.z - expected).abs() < 1e-5, "segment {}: {} vs {}", i, p.z, expected);
            assert!((p.x - anchor.x).abs() < 1e-5 && (p.y - anchor.y).abs() < 1e-5);
        }
        rope.delete(&mut world);
    }

    #[test]
    fn instant_stays_instant() {
        let mut world = world(0.0);
        let mut rope = Rope::create(&mut world, Vec3::new(0.0, 0.0, 20.0), DeploymentState::Instant, LINK).unwrap();
        for _ in 0..20 {
            rope.update(&mut world, 0.1);
        }
        assert_eq!(rope.state(), DeploymentState::Instant);
        assert_eq!(rope.progress(), 1.0);
        assert!(rope.is_settled());
        rope.delete(&mut world);
    }

    #[test]
    fn undeployed_collapses_to_anchor() {
        let mut world = world(0.0);
        let anchor = Vec3::new(0.0, 0.0, 20.0);
        let mut rope = Rope::create(&mut world, anchor, DeploymentState::Undeployed, LINK).unwrap();
        rope.update(&mut world, 0.1);
        for p in positions(&world, &rope) {
            assert!(p.distance(Vec3::new(0.0, 0.0, 18.0)) < 1e-5);
        }
        rope.delete(&mut world);
    }

    #[test]
    fn deploy_undeploy_round_trip() {
        let mut world = world(0.0);
        let anchor = Vec3::new(0.0, 0.0, 50.0);
        let mut rope = Rope::create(&mut world, anchor, DeploymentState::Undeployed, LINK).unwrap();

        rope.start_deploying();
        let mut frames = 0;
        while rope.state() != DeploymentState::Deployed {
            rope.update(&mut world, 0.05);
            assert!((0.0..=1.0).contains(&rope.progress()));
            frames += 1;
            assert!(frames < 200, "never deployed");
        }
        assert_eq!(rope.progress(), 1.0);
        let deployed_end = last_position(&world, &rope);
        assert!(deployed_end.z < 3.0);

        rope.start_undeploying();
        frames = 0;
        while rope.state() != DeploymentState::Undeployed {
            rope.update(&mut world, 0.05);
            assert!((0.0..=1.0).contains(&rope.progress()));
            frames += 1;
            assert!(frames < 200, "never undeployed");
        }
        let retracted_end = last_position(&world, &rope);
        assert!((retracted_end.z - (anchor.z - 2.0)).abs() < 0.1);
        rope.delete(&mut world);
    }

    #[test]
    fn deploying_moves_segments_down_monotonically() {
        let mut world = world(0.0);
        let mut rope = Rope::create_with_config(
            &mut world,
            Vec3::new(0.0, 0.0, 20.0),
            DeploymentState::Undeployed,
            LINK,
            &calm(),
        )
        .unwrap();
        rope.start_deploying();
        let mut previous = f32::MAX;
        for _ in 0..30 {
            rope.update(&mut world, 0.05);
            let z = last_position(&world, &rope).z;
            assert!(z <= previous + 1e-5);
            previous = z;
        }
        rope.delete(&mut world);
    }

    #[test]
    fn progress_bounded_under_random_commands() {
        use rand::{Rng, SeedableRng};
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        let mut world = world(0.0);
        let mut rope = Rope::create(&mut world, Vec3::new(0.0, 0.0, 12.0), DeploymentState::Undeployed, LINK).unwrap();
        for _ in 0..500 {
            match rng.gen_range(0..8) {
                0 => rope.start_deploying(),
                1 => rope.start_undeploying(),
                _ => {
                    rope.update(&mut world, rng.gen_range(0.0..0.5));
                }
            }
            assert!((0.0..=1.0).contains(&rope.progress()));
        }
        rope.delete(&mut world);
    }

    #[test]
    fn wind_sways_free_end_only() {
        let mut world = world(0.0);
        let anchor = Vec3::new(0.0, 0.0, 20.0);
        let mut rope = Rope::create(&mut world, anchor, DeploymentState::Instant, LINK).unwrap();
        rope.update(&mut world, 0.016);
        let phase = rope.wind_phase();
        assert!((phase - 0.015).abs() < 1e-6);

        let p = positions(&world, &rope);
        assert!(p[0].x.abs() < 1e-6 && p[0].y.abs() < 1e-6);
        let i = p.len() - 1;
        let reach = i as f32 * 0.025;
        assert!((p[i].x - phase.sin() * reach).abs() < 1e-5);
        assert!((p[i].y - phase.cos() * reach).abs() < 1e-5);
        rope.delete(&mut world);
    }

    #[test]
    fn attachment_tracks_vehicle() {
        let mut world = world(0.0);
        let heli = world.spawn_vehicle(Vec3::new(0.0, 0.0, 30.0));
        let mut rope =
            Rope::create_with_config(&mut world, Vec3::new(0.0, 0.0, 30.0), DeploymentState::Instant, LINK, &calm())
                .unwrap();
        rope.attach_to_vehicle(heli);
        rope.set_attach_offset(Vec3::new(0.5, 0.0, 0.0));

        world.set_object_position(heli, Vec3::new(10.0, 5.0, 32.0));
        assert_eq!(rope.update(&mut world, 0.016), FrameOutcome::Updated);
        assert_eq!(rope.anchor(), Vec3::new(10.0, 5.0, 32.0));
        let first = positions(&world, &rope)[0];
        assert!(first.distance(Vec3::new(10.5, 5.0, 30.0)) < 1e-5);
        rope.delete(&mut world);
    }

    #[test]
    fn lost_attachment_freezes_rope() {
        let mut world = world(0.0);
        let heli = world.spawn_vehicle(Vec3::new(0.0, 0.0, 30.0));
        let mut rope = Rope::create(&mut world, Vec3::new(0.0, 0.0, 30.0), DeploymentState::Undeployed, LINK).unwrap();
        rope.attach_to_vehicle(heli);
        rope.start_deploying();
        for _ in 0..5 {
            rope.update(&mut world, 0.05);
        }
        let before = positions(&world, &rope);
        let progress = rope.progress();
        let phase = rope.wind_phase();

        world.despawn(heli);
        for _ in 0..10 {
            assert_eq!(rope.update(&mut world, 0.05), FrameOutcome::Skipped);
        }
        assert_eq!(positions(&world, &rope), before);
        assert_eq!(rope.progress(), progress);
        assert_eq!(rope.wind_phase(), phase);
        assert_eq!(rope.anchor(), Vec3::new(0.0, 0.0, 30.0));

        // clearing the dead attachment resumes from the last resolved anchor
        rope.clear_attachment();
        assert_eq!(rope.update(&mut world, 0.05), FrameOutcome::Updated);
        assert!((positions(&world, &rope)[0].z - 28.0).abs() < 1e-4);
        rope.delete(&mut world);
    }

    #[test]
    fn override_applies_to_one_call() {
        let mut world = world(0.0);
        let anchor = Vec3::new(0.0, 0.0, 30.0);
        let mut rope = Rope::create_with_config(&mut world, anchor, DeploymentState::Deployed, LINK, &calm()).unwrap();

        let over = Vec3::new(7.0, 7.0, 40.0);
        rope.process(&mut world, 0.016, Some(over));
        assert_eq!(rope.resolved_anchor(), over);
        assert!(positions(&world, &rope)[0].distance(Vec3::new(7.0, 7.0, 38.0)) < 1e-5);

        rope.update(&mut world, 0.016);
        assert_eq!(rope.resolved_anchor(), anchor);
        assert!(positions(&world, &rope)[0].distance(Vec3::new(0.0, 0.0, 28.0)) < 1e-5);
        rope.delete(&mut world);
    }

    #[test]
    fn override_wins_over_dead_attachment() {
        let mut world = world(0.0);
        let ped = world.spawn_character(Vec3::new(0.0, 0.0, 30.0));
        let mut rope = Rope::create(&mut world, Vec3::new(0.0, 0.0, 30.0), DeploymentState::Instant, LINK).unwrap();
        rope.attach_to_character(ped);
        world.despawn(ped);
        assert_eq!(
            rope.process(&mut world, 0.016, Some(Vec3::new(0.0, 0.0, 25.0))),
            FrameOutcome::Updated
        );
        assert_eq!(rope.update(&mut world, 0.016), FrameOutcome::Skipped);
        rope.delete(&mut world);
    }

    #[test]
    fn debug_points_mark_every_segment() {
        let mut world = world(0.0);
        let mut rope = Rope::create(&mut world, Vec3::new(0.0, 0.0, 12.0), DeploymentState::Instant, LINK).unwrap();
        rope.update(&mut world, 0.016);
        assert!(world.take_markers().is_empty());

        rope.set_show_debug_points(true);
        rope.update(&mut world, 0.016);
        let markers = world.take_markers();
        assert_eq!(markers.len(), rope.segment_count());
        assert_eq!(markers, positions(&world, &rope));
        rope.delete(&mut world);
    }

    #[test]
    fn setters_reshape_the_chain() {
        let mut world = world(0.0);
        let anchor = Vec3::new(0.0, 0.0, 10.0);
        let mut rope = Rope::create(&mut world, anchor, DeploymentState::Undeployed, LINK).unwrap();
        assert_eq!(rope.segment_extent().z, 2.0);
        assert_eq!(rope.attachment(), Attachment::None);

        rope.set_wind(0.0, 0.0);
        rope.set_easing_exponent(1.0);
        rope.set_attach_offset(Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(rope.attach_offset(), Vec3::new(0.0, 1.0, 0.0));

        // linear easing: halfway progress puts segments halfway to target
        rope.start_deploying();
        rope.update(&mut world, 0.5);
        let i = rope.segment_count() - 1;
        let expected = rope.retracted_point().lerp(rope.deployed_target(i), 0.5);
        assert!(last_position(&world, &rope).distance(expected) < 1e-5);
        assert_eq!(rope.wind_phase(), 0.0);
        rope.delete(&mut world);
    }

    #[test]
    fn delete_releases_everything() {
        let mut world = world(0.0);
        let rope = Rope::create(&mut world, Vec3::new(0.0, 0.0, 21.0), DeploymentState::Instant, LINK).unwrap();
        let model = rope.model();
        let count = rope.segment_count();
        assert_eq!(world.object_count(), count);
        assert_eq!(rope.delete(&mut world), count);
        assert_eq!(world.object_count(), 0);
        assert!(!world.is_model_resident(model));
    }
}
