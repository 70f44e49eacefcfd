//! Hero skills.
//!
//! Every hero has one burst effect. The tier-3 talent of the hero's own
//! tree enlarges it.

use crate::content::{HeroId, TalentId};
use crate::game::{MatchState, Particle, ParticleKind, SkillEffect, SkillEffectKind};
use crate::geom::Vec2;

/// Anchor of map-wide skill animations.
const SKY: Vec2 = Vec2::new(400.0, 0.0);
const MID_FIELD: Vec2 = Vec2::new(400.0, 200.0);

/// Activate the hero's skill if it is ready.
///
/// Returns `false` without touching the state when the hero is dead, the
/// skill is cooling down or the match has ended.
pub fn activate(state: &mut MatchState) -> bool {
    if state.is_terminal() || !state.hero.skill_ready() {
        return false;
    }
    state.hero.skill_cooldown = state.hero.stats.skill_cooldown_ticks;
    state.hero.skill_active = true;

    let ultimate = state.hero.talents.t3.is_some_and(|t| {
        matches!(
            t,
            TalentId::RinT3Ult
                | TalentId::YukiT3Ult
                | TalentId::SakuraT3Ult
                | TalentId::TamamoT3Ult
                | TalentId::IbarakiT3Ult
        )
    });
    state.skill_effect = match state.hero.id {
        HeroId::Rin => flame_blast(state, ultimate),
        HeroId::Yuki => arrow_rain(state, ultimate),
        HeroId::Sakura => laser(state, ultimate),
        HeroId::Tamamo => fox_fog(state, ultimate),
        HeroId::Ibaraki => giant_hand(state, ultimate),
    };
    true
}

fn flame_blast(state: &mut MatchState, ultimate: bool) -> Option<SkillEffect> {
    let (radius, stun) = if ultimate { (400.0, 300) } else { (250.0, 180) };
    let origin = state.hero.pos;
    let damage = state.hero.stats.attack * 5.0;
    for enemy in state.enemies.values_mut() {
        if enemy.is_alive() && enemy.pos.distance(origin) < radius {
            enemy.hp -= damage;
            enemy.status.stun += stun;
            state
                .particles
                .push(Particle::new(ParticleKind::Skill, enemy.pos, 30, 10.0));
        }
    }
    Some(SkillEffect {
        kind: SkillEffectKind::RinBlast,
        timer: 60,
        pos: origin,
    })
}

fn arrow_rain(state: &mut MatchState, ultimate: bool) -> Option<SkillEffect> {
    let damage = state.hero.stats.attack * 3.0;
    for enemy in state.enemies.values_mut().filter(|e| e.is_alive()) {
        enemy.hp -= damage;
        enemy.status.freeze += 60;
        state.particles.push(Particle::new(
            ParticleKind::Skill,
            enemy.pos.offset(0.0, -20.0),
            20,
            8.0,
        ));
    }
    Some(SkillEffect {
        kind: SkillEffectKind::YukiRain,
        timer: if ultimate { 240 } else { 120 },
        pos: SKY,
    })
}

/// Nuke centered on the toughest enemy; nothing happens on an empty field.
fn laser(state: &mut MatchState, ultimate: bool) -> Option<SkillEffect> {
    let (radius, multiplier) = if ultimate { (240.0, 15.0) } else { (120.0, 10.0) };
    let center = state
        .enemies
        .values()
        .filter(|e| e.is_alive())
        .max_by(|a, b| a.hp.total_cmp(&b.hp))?
        .pos;
    let damage = state.hero.stats.attack * multiplier;
    for enemy in state.enemies.values_mut() {
        if enemy.is_alive() && enemy.pos.distance(center) < radius {
            enemy.hp -= damage;
        }
    }
    state.emit(Particle::new(ParticleKind::Skill, center, 60, radius));
    Some(SkillEffect {
        kind: SkillEffectKind::SakuraLaser,
        timer: 40,
        pos: state.hero.pos,
    })
}

fn fox_fog(state: &mut MatchState, ultimate: bool) -> Option<SkillEffect> {
    let damage = state.hero.stats.attack * 2.0;
    for enemy in state.enemies.values_mut().filter(|e| e.is_alive()) {
        enemy.status.burn += 300;
        enemy.status.freeze += 300;
        enemy.hp -= damage;
    }
    Some(SkillEffect {
        kind: SkillEffectKind::TamamoFog,
        timer: if ultimate { 1200 } else { 180 },
        pos: MID_FIELD,
    })
}

fn giant_hand(state: &mut MatchState, ultimate: bool) -> Option<SkillEffect> {
    let radius = if ultimate { 450.0 } else { 300.0 };
    let origin = state.hero.pos;
    let damage = state.hero.stats.attack * 4.0;
    state.hero.heal(500.0);
    for enemy in state.enemies.values_mut() {
        if enemy.is_alive() && enemy.pos.distance(origin) < radius {
            enemy.hp -= damage;
            if ultimate && enemy.hp < enemy.max_hp * 0.2 {
                enemy.hp = 0.0;
            }
        }
    }
    Some(SkillEffect {
        kind: SkillEffectKind::IbarakiHand,
        timer: 50,
        pos: origin,
    })
}
