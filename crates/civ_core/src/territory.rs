//! City territory: claims, worked tiles and city yields.

use std::cmp::Reverse;
use std::collections::BTreeSet;

use crate::city::City;
use crate::hex::HexCoord;
use crate::ids::CityId;
use crate::map::TileLookup;
use crate::rules::Ruleset;
use crate::state::EntityStore;
use crate::tile::TileYields;

/// Territory membership queries.
pub trait TerritoryLookup {
    /// Tiles owned by `city`.
    fn territory_of(&self, city: CityId) -> Option<&BTreeSet<HexCoord>>;

    /// City owning the tile, if any.
    fn owner_of_tile(&self, coord: HexCoord) -> Option<CityId>;
}

impl TerritoryLookup for EntityStore<CityId, City> {
    fn territory_of(&self, city: CityId) -> Option<&BTreeSet<HexCoord>> {
        self.get(city).map(|c| &c.territory)
    }

    fn owner_of_tile(&self, coord: HexCoord) -> Option<CityId> {
        self.values()
            .find(|c| c.territory.contains(&coord))
            .map(|c| c.id)
    }
}

/// Tiles a new city at `centre` claims: the centre itself, plus
/// everything on the map within `radius` that no other city owns.
///
/// The centre is claimed even when another city owns it; pair this with
/// [`release_tile`] so the tile ends up in exactly one territory.
pub fn initial_claim(
    map: &(impl TileLookup + ?Sized),
    claimed: &(impl TerritoryLookup + ?Sized),
    centre: HexCoord,
    radius: u32,
) -> BTreeSet<HexCoord> {
    centre
        .range(radius)
        .into_iter()
        .filter(|c| map.tile(*c).is_some())
        .filter(|c| *c == centre || claimed.owner_of_tile(*c).is_none())
        .collect()
}

/// Take `coord` out of the territory of whichever city owns it and
/// return that city.
pub(crate) fn release_tile(
    cities: &mut EntityStore<CityId, City>,
    coord: HexCoord,
) -> Option<CityId> {
    let owner = cities.owner_of_tile(coord)?;
    cities.get_mut(owner)?.territory.remove(&coord);
    tracing::debug!(city = %owner, %coord, "tile released to a new city centre");
    Some(owner)
}

/// Centre plus the `population` best territory tiles, ranked by food,
/// production then gold (all descending), ties broken by coordinate.
pub fn worked_tiles(map: &(impl TileLookup + ?Sized), city: &City) -> Vec<HexCoord> {
    let mut candidates: Vec<(HexCoord, TileYields)> = city
        .territory
        .iter()
        .filter(|c| **c != city.position)
        .filter_map(|c| map.tile(*c).map(|t| (*c, t.yields())))
        .collect();
    candidates.sort_by_key(|(coord, y)| {
        (Reverse(y.food), Reverse(y.production), Reverse(y.gold), *coord)
    });

    let mut worked = vec![city.position];
    worked.extend(
        candidates
            .into_iter()
            .take(city.population as usize)
            .map(|(coord, _)| coord),
    );
    worked
}

/// Per-turn food, production and gold of a city.
///
/// The centre tile yields at least the ruleset minimums; buildings add
/// their flat bonuses.
pub fn city_yields(map: &(impl TileLookup + ?Sized), city: &City, rules: &Ruleset) -> TileYields {
    let mut total = TileYields::default();
    for coord in worked_tiles(map, city) {
        let mut y = map.tile(coord).map(|t| t.yields()).unwrap_or_default();
        if coord == city.position {
            y.food = y.food.max(rules.center_min_food);
            y.production = y.production.max(rules.center_min_production);
        }
        total = total + y;
    }
    total + city.building_yields(rules)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::PlayerId;
    use crate::map::TileMap;
    use crate::tile::{Terrain, Tile, TileFeature};

    fn city_at(id: u32, position: HexCoord, territory: BTreeSet<HexCoord>) -> City {
        City::new(CityId(id), PlayerId(0), format!("City {id}"), position, territory)
    }

    #[test]
    fn test_initial_claim_skips_off_map_and_claimed() {
        let map = TileMap::rectangle(5, 5, Terrain::Grassland);
        let mut cities = EntityStore::<CityId, City>::new();
        let first_claim = initial_claim(&map, &cities, HexCoord::new(1, 1), 1);
        assert_eq!(first_claim.len(), 7);
        cities.insert(|id| city_at(id.0, HexCoord::new(1, 1), first_claim));

        let corner = initial_claim(&map, &cities, HexCoord::new(0, 0), 1);
        assert!(corner.iter().all(|c| map.contains(*c)));

        let second = initial_claim(&map, &cities, HexCoord::new(3, 1), 1);
        assert!(!second.contains(&HexCoord::new(2, 1)));
        assert!(second.contains(&HexCoord::new(3, 1)));
        assert_eq!(cities.owner_of_tile(HexCoord::new(2, 1)), Some(CityId(1)));
        assert_eq!(cities.owner_of_tile(HexCoord::new(4, 4)), None);
    }

    #[test]
    fn test_centre_inside_foreign_territory_moves_to_new_city() {
        let map = TileMap::rectangle(6, 4, Terrain::Grassland);
        let mut cities = EntityStore::<CityId, City>::new();
        let old_centre = HexCoord::new(2, 2);
        let claim = initial_claim(&map, &cities, old_centre, 1);
        cities.insert(|id| city_at(id.0, old_centre, claim));

        let new_centre = HexCoord::new(3, 2);
        assert_eq!(cities.owner_of_tile(new_centre), Some(CityId(1)));
        let claim = initial_claim(&map, &cities, new_centre, 1);
        assert!(claim.contains(&new_centre));
        assert!(!claim.contains(&old_centre));

        assert_eq!(release_tile(&mut cities, new_centre), Some(CityId(1)));
        assert_eq!(release_tile(&mut cities, new_centre), None);
        cities.insert(|id| city_at(id.0, new_centre, claim));
        assert_eq!(cities.owner_of_tile(new_centre), Some(CityId(2)));
        assert!(!cities.get(CityId(1)).unwrap().territory.contains(&new_centre));
    }

    #[test]
    fn test_worked_tiles_prefer_food_then_production() {
        let centre = HexCoord::new(1, 1);
        let map = TileMap::rectangle(3, 3, Terrain::Plains)
            .with_tile(Tile::new(HexCoord::new(2, 1), Terrain::Grassland))
            .unwrap()
            .with_tile(Tile::new(HexCoord::new(0, 1), Terrain::Desert).with_feature(TileFeature::Oasis))
            .unwrap()
            .with_tile(Tile::new(HexCoord::new(1, 0), Terrain::PlainsHill))
            .unwrap();
        let mut city = city_at(1, centre, centre.range(1).into_iter().collect());
        city.population = 2;

        let worked = worked_tiles(&map, &city);
        assert_eq!(
            worked,
            vec![centre, HexCoord::new(0, 1), HexCoord::new(2, 1)]
        );
    }

    #[test]
    fn test_city_yields_apply_center_minimum() {
        let centre = HexCoord::new(0, 0);
        let map = TileMap::strip(2, Terrain::Grassland);
        let city = city_at(1, centre, [centre, HexCoord::new(1, 0)].into());
        let rules = Ruleset::default();
        // centre grassland 2/0 lifted to 2/1, one worked grassland 2/0
        assert_eq!(
            city_yields(&map, &city, &rules),
            TileYields {
                food: 4,
                production: 1,
                gold: 0
            }
        );
    }
}
