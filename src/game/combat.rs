//! Combat resolution.
//!
//! One pass per tick, in a fixed order since later steps see the mutations
//! of earlier ones:
//! 1. Support auras
//! 2. Barracks soldiers
//! 3. Attack towers
//! 4. Gold mines
//! 5. The hero
//! 6. Enemy status effects and movement

use std::collections::BTreeMap;

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::content::{TalentId, TowerKind, ms_to_ticks};
use crate::game::hero::{ENEMY_HIT_DAMAGE, HERO_SPEED};
use crate::game::{
    Blocker, Enemy, EnemyId, Hero, HeroState, IdAllocator, MatchState, Particle, ParticleKind,
    Projectile, ProjectileId, Soldier,
};
use crate::geom::Vec2;

/// Soldiers notice enemies closer than this.
pub const AGGRO_RANGE: f64 = 90.0;
/// Soldiers give up on targets farther than this.
pub const LEASH_RANGE: f64 = 150.0;
/// Soldiers fight enemies within this distance.
pub const ENGAGE_RANGE: f64 = 20.0;
/// Blocked enemies are held this far from their soldier.
pub const STAND_OFF: f64 = 12.0;
/// Soldier speed when closing on a target.
pub const CHASE_SPEED: f64 = 3.0;
/// Soldier speed when walking back to the rally point.
pub const RETURN_SPEED: f64 = 1.5;
/// Tower projectile speed.
pub const PROJECTILE_SPEED: f64 = 8.0;
/// Hero projectile speed.
pub const HERO_PROJECTILE_SPEED: f64 = 10.0;
/// Minimum freeze kept on enemies inside a slowing aura.
pub const AURA_FREEZE_TICKS: u32 = 60;

const SOLDIER_HIT_CHANCE: f64 = 0.05;
const SOLDIER_STRUCK_CHANCE: f64 = 0.03;
const HERO_TRADE_CHANCE: f64 = 0.1;
const SOLDIER_REGEN: f64 = 0.5;
const HERO_REGEN: f64 = 0.1;
const SOUL_LINK_HEAL: f64 = 1.0;

/// Mutable pieces of the match a single unit acts on.
struct Field<'a> {
    enemies: &'a mut BTreeMap<EnemyId, Enemy>,
    projectiles: &'a mut BTreeMap<ProjectileId, Projectile>,
    particles: &'a mut Vec<Particle>,
    ids: &'a mut IdAllocator,
    rng: &'a mut ChaCha8Rng,
    tick: u64,
}

/// Per-squad values shared by the soldiers of one barracks.
#[derive(Clone, Copy)]
struct Squad {
    armor: f64,
    respawn: u32,
}

/// Run the whole combat pass for the current tick.
pub fn resolve(state: &mut MatchState) {
    apply_support_auras(state);
    update_barracks(state);
    fire_towers(state);
    pay_gold_mines(state);
    update_hero(state);
    update_enemies(state);
}

/// Ticks between tower attacks, shortened by a support speed boost.
#[must_use]
pub fn attack_interval(rate_ms: u32, boosted: bool) -> u64 {
    let ticks = ms_to_ticks(rate_ms);
    // +40% attack rate: interval / 1.4
    if boosted { (ticks * 5).div_ceil(7) } else { ticks }
}

fn apply_support_auras(state: &mut MatchState) {
    for tower in state.towers.values_mut() {
        tower.speed_boost = false;
    }
    let totems: Vec<_> = state
        .towers_of(TowerKind::Support)
        .map(|t| (t.id, t.pos, t.stats().range, t.tier.branch()))
        .collect();

    for (id, pos, range, branch) in totems {
        match branch {
            0 => {
                for tower in state.towers.values_mut() {
                    if tower.id != id && tower.pos.distance(pos) <= range {
                        tower.speed_boost = true;
                    }
                }
            }
            1 => {
                for enemy in state.enemies.values_mut() {
                    if enemy.is_alive() && enemy.pos.distance(pos) <= range {
                        enemy.status.freeze_at_least(AURA_FREEZE_TICKS);
                    }
                }
            }
            _ => {
                let linked = state.towers.values_mut().filter(|t| {
                    t.kind == TowerKind::Barracks && t.id != id && t.pos.distance(pos) <= range
                });
                for tower in linked {
                    for soldier in tower.soldiers.iter_mut().filter(|s| !s.dead) {
                        soldier.hp = (soldier.hp + SOUL_LINK_HEAL).min(soldier.max_hp);
                    }
                }
            }
        }
    }
}

fn update_barracks(state: &mut MatchState) {
    let MatchState {
        towers,
        enemies,
        projectiles,
        particles,
        ids,
        rng,
        rules,
        tick,
        ..
    } = state;
    let mut field = Field {
        enemies,
        projectiles,
        particles,
        ids,
        rng,
        tick: *tick,
    };

    for tower in towers.values_mut().filter(|t| t.kind == TowerKind::Barracks) {
        let squad = Squad {
            armor: tower.stats().soldier_armor.unwrap_or(0.0),
            respawn: rules.soldier_respawn(tower.tier),
        };
        for index in 0..tower.soldiers.len() {
            let rally = tower.rally_position(tower.soldiers[index].slot);
            step_soldier(&mut tower.soldiers[index], rally, squad, &mut field);
        }
    }
}

fn step_soldier(soldier: &mut Soldier, rally: Vec2, squad: Squad, field: &mut Field<'_>) {
    if soldier.dead {
        soldier.respawn_timer = soldier.respawn_timer.saturating_sub(1);
        if soldier.respawn_timer == 0 {
            soldier.dead = false;
            soldier.hp = soldier.max_hp;
            soldier.target = None;
        }
        return;
    }

    let blocker = Blocker::Soldier(soldier.id);
    let target = retarget(soldier, field.enemies);
    match target.and_then(|id| field.enemies.get_mut(&id)) {
        Some(enemy) if soldier.pos.distance(enemy.pos) <= ENGAGE_RANGE => {
            enemy.blocked_by = Some(blocker);
            enemy.pos = enemy.pos.stand_off_from(soldier.pos, STAND_OFF);
            let strikes = field.rng.gen_bool(SOLDIER_HIT_CHANCE);
            let struck = field.rng.gen_bool(SOLDIER_STRUCK_CHANCE);
            if strikes {
                enemy.hp -= soldier.damage;
                field
                    .particles
                    .push(Particle::new(ParticleKind::SoldierHit, enemy.pos, 5, 4.0));
            }
            if struck && !enemy.status.is_stunned() {
                soldier.hp -= (ENEMY_HIT_DAMAGE * (1.0 - squad.armor)).max(1.0);
            }
        }
        Some(enemy) => {
            soldier.pos.step_toward(enemy.pos, CHASE_SPEED);
        }
        None => {
            if soldier.pos.distance(rally) > 2.0 {
                soldier.pos.step_toward(rally, RETURN_SPEED);
            } else {
                soldier.pos = rally;
            }
        }
    }

    if soldier.hp <= 0.0 {
        soldier.dead = true;
        soldier.respawn_timer = squad.respawn;
        if let Some(enemy) = soldier.target.take().and_then(|id| field.enemies.get_mut(&id)) {
            enemy.release_from(blocker);
        }
    } else if soldier.target.is_none() {
        soldier.hp = (soldier.hp + SOLDIER_REGEN).min(soldier.max_hp);
    }
}

/// Keep the current target if it is still valid, otherwise pick the
/// nearest eligible enemy inside the aggro radius.
fn retarget(soldier: &mut Soldier, enemies: &mut BTreeMap<EnemyId, Enemy>) -> Option<EnemyId> {
    let blocker = Blocker::Soldier(soldier.id);
    let eligible = |e: &Enemy| {
        e.is_alive() && !e.flying && e.blocked_by.is_none_or(|b| b == blocker)
    };

    if let Some(id) = soldier.target {
        let keep = enemies
            .get(&id)
            .is_some_and(|e| eligible(e) && e.pos.distance(soldier.pos) <= LEASH_RANGE);
        if keep {
            return Some(id);
        }
        if let Some(enemy) = enemies.get_mut(&id) {
            enemy.release_from(blocker);
        }
    }

    soldier.target = enemies
        .values()
        .filter(|&e| eligible(e))
        .map(|e| (e.id, e.pos.distance(soldier.pos)))
        .filter(|&(_, dist)| dist < AGGRO_RANGE)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(id, _)| id);
    soldier.target
}

fn fire_towers(state: &mut MatchState) {
    let MatchState {
        towers,
        enemies,
        projectiles,
        ids,
        tick,
        ..
    } = state;

    for tower in towers.values_mut().filter(|t| t.kind.is_attack()) {
        let stats = tower.stats();
        let Some(kind) = stats.projectile else {
            continue;
        };
        if !tower.is_ready(*tick, attack_interval(stats.rate_ms, tower.speed_boost)) {
            continue;
        }
        let Some(target) = enemies
            .values()
            .find(|e| e.is_alive() && e.pos.distance(tower.pos) <= stats.range)
        else {
            continue;
        };

        let id = ids.projectile();
        projectiles.insert(
            id,
            Projectile {
                id,
                pos: tower.pos.offset(0.0, -20.0),
                target: target.id,
                aim: target.pos,
                speed: PROJECTILE_SPEED,
                damage: stats.damage,
                kind,
                splash_radius: stats.splash_radius,
                from_hero: false,
            },
        );
        tower.last_attack = Some(*tick);
    }
}

fn pay_gold_mines(state: &mut MatchState) {
    let tick = state.tick;
    let mut payouts = Vec::new();
    for tower in state
        .towers
        .values_mut()
        .filter(|t| t.kind == TowerKind::GoldMine)
    {
        let stats = tower.stats();
        if tower.is_ready(tick, ms_to_ticks(stats.rate_ms)) {
            tower.last_attack = Some(tick);
            payouts.push((tower.pos, stats.income));
        }
    }
    for (pos, income) in payouts {
        state.money += f64::from(income);
        state.emit(Particle::new(ParticleKind::Gold, pos.offset(0.0, -10.0), 30, 15.0));
    }
}

fn update_hero(state: &mut MatchState) {
    let MatchState {
        hero,
        enemies,
        projectiles,
        particles,
        ids,
        rng,
        tick,
        level,
        ..
    } = state;
    let mut field = Field {
        enemies,
        projectiles,
        particles,
        ids,
        rng,
        tick: *tick,
    };

    hero.skill_cooldown = hero.skill_cooldown.saturating_sub(1);
    if hero.dead {
        hero.respawn_timer = hero.respawn_timer.saturating_sub(1);
        if hero.respawn_timer == 0 {
            hero.dead = false;
            hero.hp = hero.stats.max_hp;
            hero.pos = level.hero_return_point();
            hero.state = HeroState::Idle;
            hero.fighting = None;
            hero.move_target = None;
            tracing::debug!(target: "skyguard::combat", tick = field.tick, "hero respawned");
        }
        return;
    }

    if hero.state == HeroState::Moving {
        let arrived = match hero.move_target {
            Some(target) => hero.pos.step_toward(target, HERO_SPEED),
            None => true,
        };
        if arrived {
            hero.state = HeroState::Idle;
            hero.move_target = None;
        }
        if let Some(enemy) = hero.fighting.take().and_then(|id| field.enemies.get_mut(&id)) {
            enemy.release_from(Blocker::Hero);
        }
    }
    if hero.state != HeroState::Fighting {
        hero.heal(HERO_REGEN);
    }

    if hero.is_ranged() && hero.state == HeroState::Idle {
        hero_shoot(hero, &mut field);
    }
    hero_engage(hero, field.enemies);
    if hero.state == HeroState::Fighting {
        hero_trade(hero, &mut field);
    }
}

fn hero_shoot(hero: &mut Hero, field: &mut Field<'_>) {
    let interval = hero.stats.attack_interval_ticks;
    if hero
        .last_attack
        .is_some_and(|last| field.tick.saturating_sub(last) < interval)
    {
        return;
    }
    let Some(target) = field
        .enemies
        .values()
        .find(|e| e.is_alive() && e.pos.distance(hero.pos) < hero.stats.range)
    else {
        return;
    };

    let mut damage = hero.stats.attack;
    if hero.has(TalentId::YukiT2Crit) && field.rng.gen_bool(0.2) {
        damage *= 2.5;
    }
    if hero.has(TalentId::SakuraT2Headshot) && target.hp < target.max_hp * 0.3 {
        damage *= 2.0;
    }
    let splash_radius = hero.has(TalentId::SakuraT2Splash).then_some(40.0);

    let id = field.ids.projectile();
    field.projectiles.insert(
        id,
        Projectile {
            id,
            pos: hero.pos.offset(0.0, -15.0),
            target: target.id,
            aim: target.pos,
            speed: HERO_PROJECTILE_SPEED,
            damage,
            kind: hero.stats.projectile_kind(),
            splash_radius,
            from_hero: true,
        },
    );
    hero.last_attack = Some(field.tick);
}

/// Lock the hero into melee with the first unblocked ground enemy in reach.
fn hero_engage(hero: &mut Hero, enemies: &mut BTreeMap<EnemyId, Enemy>) {
    if hero.state == HeroState::Moving || hero.fighting.is_some() {
        return;
    }
    let reach = hero.engage_range();
    if let Some(enemy) = enemies
        .values_mut()
        .find(|e| e.is_engageable() && e.pos.distance(hero.pos) < reach)
    {
        enemy.blocked_by = Some(Blocker::Hero);
        hero.state = HeroState::Fighting;
        hero.fighting = Some(enemy.id);
    }
}

fn hero_trade(hero: &mut Hero, field: &mut Field<'_>) {
    let Some(enemy) = hero
        .fighting
        .and_then(|id| field.enemies.get_mut(&id))
        .filter(|e| e.is_alive() && e.blocked_by == Some(Blocker::Hero))
    else {
        hero.disengage();
        return;
    };

    let struck = field.rng.gen_bool(HERO_TRADE_CHANCE);
    if struck && !enemy.status.is_stunned() {
        if hero.has(TalentId::RinT2Thorns) {
            enemy.hp -= ENEMY_HIT_DAMAGE * 0.3;
        }
        hero.hp -= hero.stats.mitigate(ENEMY_HIT_DAMAGE);
    }

    let mut cleave = None;
    if field.rng.gen_bool(HERO_TRADE_CHANCE) {
        let damage = hero.stats.attack;
        if hero.has(TalentId::IbarakiT2Lifesteal) {
            hero.heal(damage * 0.2);
        }
        enemy.hp -= damage;
        field
            .particles
            .push(Particle::new(ParticleKind::HeroHit, enemy.pos, 8, 8.0));
        if hero.has(TalentId::IbarakiT2Cleave) {
            cleave = Some((enemy.id, enemy.pos, damage * 0.5));
        }
    }

    if hero.hp <= 0.0 {
        enemy.release_from(Blocker::Hero);
        hero.dead = true;
        hero.respawn_timer = hero.stats.respawn_ticks;
        hero.state = HeroState::Idle;
        hero.fighting = None;
        hero.move_target = None;
        tracing::debug!(target: "skyguard::combat", tick = field.tick, "hero died");
    }

    if let Some((primary, center, damage)) = cleave {
        for other in field.enemies.values_mut() {
            if other.id != primary && other.is_alive() && other.pos.distance(center) <= 40.0 {
                other.hp -= damage;
            }
        }
    }
}

fn update_enemies(state: &mut MatchState) {
    let burn_aura = !state.hero.dead && state.hero.has(TalentId::RinT2Burn);
    let hero_pos = state.hero.pos;
    let paths = state.level.paths;

    for enemy in state.enemies.values_mut() {
        if !enemy.is_alive() {
            continue;
        }
        let mut speed = enemy.speed;
        let status = &mut enemy.status;
        if status.freeze > 0 {
            speed *= 0.5;
            status.freeze -= 1;
        }
        if status.burn > 0 {
            enemy.hp -= 0.5;
            status.burn -= 1;
        }
        if status.stun > 0 {
            speed = 0.0;
            status.stun -= 1;
        }
        if burn_aura && enemy.pos.distance(hero_pos) < 100.0 {
            enemy.hp -= 0.25;
        }

        if enemy.blocked_by.is_some() || speed <= 0.0 {
            continue;
        }
        let Some(next) = paths
            .get(enemy.path)
            .and_then(|path| path.get(enemy.path_index + 1))
        else {
            enemy.finished = true;
            continue;
        };
        if enemy.pos.step_toward(*next, speed) {
            enemy.path_index += 1;
        }
    }
}
