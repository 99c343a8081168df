use crate::config::DefenseConfig;
use crate::events::DefenseEvent;
use crate::state::DefenseState;
use crate::world::{BurstKind, Particle, ParticleId, World};
use glam::Vec3;
use rand::Rng;

/// Emits a cosmetic burst at `position`. Particles never touch gameplay state.
pub fn spawn_burst(
    state: &mut DefenseState,
    position: Vec3,
    effect: BurstKind,
    events: &mut Vec<DefenseEvent>,
) {
    let count = state.config.particles_per_burst;
    for _ in 0..count {
        let velocity = Vec3::new(
            (state.rng.gen::<f32>() - 0.5) * 0.2,
            state.rng.gen::<f32>() * 0.3,
            (state.rng.gen::<f32>() - 0.5) * 0.2,
        );
        state.world.particles.insert(Particle {
            position,
            velocity,
            lifetime: state.config.particle_lifetime_ticks,
            scale: 1.0,
            effect,
        });
    }
    events.push(DefenseEvent::ParticleBurst {
        effect,
        position,
        count,
    });
}

pub fn advance_particles(world: &mut World, config: &DefenseConfig) {
    let mut expired: Vec<ParticleId> = Vec::new();

    for (id, particle) in world.particles.iter_mut() {
        particle.position += particle.velocity;
        particle.velocity.y -= config.particle_gravity;
        particle.scale *= config.particle_shrink;
        particle.lifetime = particle.lifetime.saturating_sub(1);
        if particle.lifetime == 0 {
            expired.push(id);
        }
    }

    for id in expired {
        world.particles.remove(id);
    }
}
