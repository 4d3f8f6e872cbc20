//! Extraction of the gameplay-reachable data set.
//!
//! The raw tables contain editor leftovers and unreachable entries. The
//! extraction pass keeps only what normal play can produce: published
//! technologies, the recipes those technologies unlock on top of the fixed
//! starting set, and the items those recipes and technologies touch.

use std::collections::{BTreeMap, HashSet};

use crate::container::ContainerFile;
use crate::proto::{ItemProto, ModelProto, ProtoSet, RecipeProto, TechProto};
use crate::resolve::Resolver;
use crate::Result;

/// Recipe identifiers unlocked at the start of a new game.
pub const STARTING_RECIPES: [i32; 7] = [1, 2, 3, 4, 5, 6, 50];

/// The gameplay-reachable slice of the data tables.
#[derive(Debug, Clone)]
pub struct GameData {
    /// Items reachable through research or crafting.
    pub items: Vec<ItemProto>,
    /// Recipes unlocked at the start or through research.
    pub recipes: Vec<RecipeProto>,
    /// Published technologies.
    pub techs: Vec<TechProto>,
}

impl GameData {
    /// Extracts the reachable data set from a container holding the game's
    /// data tables.
    ///
    /// Loads the item, recipe, technology and model tables, runs descriptor
    /// calibration and attachment over the items, then filters to the
    /// reachable slice.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`ProtoSet::load`] and [`Resolver::new`].
    pub fn extract(container: &ContainerFile) -> Result<GameData> {
        let items = ProtoSet::<ItemProto>::load(container)?;
        let recipes = ProtoSet::<RecipeProto>::load(container)?;
        let techs = ProtoSet::<TechProto>::load(container)?;
        let models = ProtoSet::<ModelProto>::load(container)?;

        let mut items = items.entries;
        let mut resolver = Resolver::new(container)?;
        resolver.resolve(&mut items, &models);

        Ok(Self::filter(items, recipes.entries, techs.entries))
    }

    /// Filters already decoded tables down to the reachable slice.
    #[must_use]
    pub fn filter(
        items: Vec<ItemProto>,
        recipes: Vec<RecipeProto>,
        techs: Vec<TechProto>,
    ) -> GameData {
        let techs: Vec<TechProto> = techs.into_iter().filter(|tech| tech.published).collect();

        let mut unlockable: HashSet<i32> = STARTING_RECIPES.into_iter().collect();
        for tech in &techs {
            unlockable.extend(tech.unlock_recipes.iter().copied());
        }
        let recipes: Vec<RecipeProto> = recipes
            .into_iter()
            .filter(|recipe| unlockable.contains(&recipe.id))
            .collect();

        let mut available: HashSet<i32> = HashSet::new();
        for tech in &techs {
            available.extend(tech.items.iter().copied());
        }
        for recipe in &recipes {
            available.extend(recipe.items.iter().copied());
            available.extend(recipe.results.iter().copied());
        }
        let items: Vec<ItemProto> = items
            .into_iter()
            .filter(|item| available.contains(&item.id))
            .collect();

        GameData {
            items,
            recipes,
            techs,
        }
    }

    /// Icon sprite paths of every kept item and recipe, keyed by `(kind,
    /// id)` where `kind` is `"item"`, `"recipe"` or `"tech"`. Entries with
    /// an empty path are omitted.
    #[must_use]
    pub fn icon_paths(&self) -> BTreeMap<(&'static str, i32), &str> {
        let mut paths: BTreeMap<(&'static str, i32), &str> = BTreeMap::new();
        for item in &self.items {
            if !item.icon_path.is_empty() {
                paths.insert(("item", item.id), &item.icon_path);
            }
        }
        for recipe in &self.recipes {
            if !recipe.icon_path.is_empty() {
                paths.insert(("recipe", recipe.id), &recipe.icon_path);
            }
        }
        for tech in &self.techs {
            if !tech.icon_path.is_empty() {
                paths.insert(("tech", tech.id), &tech.icon_path);
            }
        }
        paths
    }
}
