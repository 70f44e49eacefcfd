//! Projectile flight and impact.

use rand::Rng;

use crate::content::{ProjectileKind, TalentId};
use crate::game::{MatchState, Particle, ParticleKind, Projectile};
use crate::geom::Vec2;

/// Freeze applied by a direct magic hit.
pub const MAGIC_FREEZE_TICKS: u32 = 30;
/// Freeze applied by hero shots with the slowing talent.
pub const TALENT_SLOW_TICKS: u32 = 120;
/// Stun applied by a successful charm.
pub const CHARM_STUN_TICKS: u32 = 60;
/// Reach of a piercing hero shot past its target.
pub const PIERCE_RADIUS: f64 = 60.0;

const CHARM_CHANCE: f64 = 0.15;

/// Move every projectile and apply the ones that arrive.
///
/// A projectile whose target is gone is dropped, unless it carries a splash
/// radius, in which case it flies on to the last point it aimed at.
pub fn resolve(state: &mut MatchState) {
    let ids: Vec<_> = state.projectiles.keys().copied().collect();
    for id in ids {
        let Some(mut shot) = state.projectiles.remove(&id) else {
            continue;
        };
        let target = state
            .enemies
            .get(&shot.target)
            .filter(|e| e.is_alive())
            .map(|e| e.pos);
        match target {
            Some(pos) => shot.aim = pos,
            None if shot.splash_radius.is_none() => continue,
            None => {}
        }

        if shot.pos.distance(shot.aim) <= shot.speed {
            match shot.splash_radius {
                Some(radius) => detonate(state, &shot, radius),
                None => strike(state, &shot),
            }
        } else {
            shot.pos.step_toward(shot.aim, shot.speed);
            state.projectiles.insert(id, shot);
        }
    }
}

/// Full damage to every living enemy within `radius` of the impact point.
fn detonate(state: &mut MatchState, shot: &Projectile, radius: f64) {
    let center = shot.aim;
    for enemy in state.enemies.values_mut() {
        if enemy.is_alive() && enemy.pos.distance(center) <= radius {
            enemy.hp -= shot.damage;
        }
    }
    state.emit(Particle::new(ParticleKind::Splash, center, 30, radius));
}

fn strike(state: &mut MatchState, shot: &Projectile) {
    let talents = state.hero.talents;
    let Some(enemy) = state.enemies.get_mut(&shot.target) else {
        return;
    };
    enemy.hp -= shot.damage;
    if shot.kind == ProjectileKind::Magic {
        enemy.status.freeze_at_least(MAGIC_FREEZE_TICKS);
    }
    if shot.from_hero {
        if talents.has(TalentId::TamamoT2Slow) {
            enemy.status.freeze_at_least(TALENT_SLOW_TICKS);
        }
        if talents.has(TalentId::TamamoT2Charm) && state.rng.gen_bool(CHARM_CHANCE) {
            enemy.status.stun = enemy.status.stun.max(CHARM_STUN_TICKS);
        }
    }
    let impact = enemy.pos;

    if shot.from_hero && talents.has(TalentId::YukiT2Pierce) {
        pierce(state, shot, impact);
    }
    let (life, radius) = if shot.from_hero { (10, 6.0) } else { (5, 4.0) };
    state.emit(Particle::new(ParticleKind::Impact, impact, life, radius));
}

/// Carry the hit on to the nearest other living enemy close to the impact.
fn pierce(state: &mut MatchState, shot: &Projectile, impact: Vec2) {
    let next = state
        .enemies
        .values()
        .filter(|e| e.id != shot.target && e.is_alive())
        .map(|e| (e.id, e.pos.distance(impact)))
        .filter(|&(_, dist)| dist <= PIERCE_RADIUS)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(id, _)| id);
    if let Some(enemy) = next.and_then(|id| state.enemies.get_mut(&id)) {
        enemy.hp -= shot.damage;
    }
}
