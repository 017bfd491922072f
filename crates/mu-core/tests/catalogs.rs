use mu_core::GameRng;
use mu_core::magic::{SkillCatalog, SpellId};
use mu_core::monster::{MonsterCatalog, SpeciesId};
use mu_core::object::{ItemCatalog, ItemKind, ItemNumber, generate_loot};
use mu_core::world::ServerRates;

const ITEMS: &str = include_str!("../data/items.json");
const SKILLS: &str = include_str!("../data/skills.json");
const MONSTERS: &str = include_str!("../data/monsters.json");
const RATES: &str = include_str!("../data/rates.json");

#[test]
fn test_bundled_catalogs_load() {
    let items = ItemCatalog::parse(ITEMS).unwrap();
    let skills = SkillCatalog::parse(SKILLS).unwrap();
    let monsters = MonsterCatalog::parse(MONSTERS).unwrap();
    let rates = ServerRates::parse(RATES).unwrap();

    assert_eq!(items.count(ItemKind::Sword), 6);
    assert!(items.get(ItemNumber::new(ItemKind::Potion, 17)).is_some());
    assert_eq!(rates.drop_rate, 30);

    // every innate spell resolves
    for id in monsters.ids() {
        let template = monsters.get(id).unwrap();
        if let Some(spell) = template.spell {
            assert!(skills.get(spell).is_some(), "{} casts unknown {spell:?}", template.name);
        }
    }
    assert_eq!(monsters.get(SpeciesId(5)).unwrap().spell, Some(SpellId(3)));
}

#[test]
fn test_bundled_loot_for_each_species() {
    let items = ItemCatalog::parse(ITEMS).unwrap();
    let monsters = MonsterCatalog::parse(MONSTERS).unwrap();
    let mut rng = GameRng::new(42);

    for id in monsters.ids() {
        let template = monsters.get(id).unwrap();
        let pool = generate_loot(template.level, &items, &mut rng);
        assert!(!pool.is_empty(), "{}", template.name);
        assert!(pool.len() <= mu_core::LOOT_POOL_SIZE);
        for item in pool.items() {
            assert_ne!(item.number, ItemNumber::new(ItemKind::Miscellaneous, 3));
            if item.number == ItemNumber::new(ItemKind::WingOrbSeed, 15) {
                assert!((13..=66).contains(&template.level));
            }
        }
    }
}
