#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Genetic search: a population of bit-vector chromosomes evolved by
//! fitness-proportional selection, single-point crossover and per-gene
//! mutation.
//!
//! Each chromosome carries one gene (bit) per distinct variable,
//! index-aligned with the formula's variable arena, and is independent of
//! the arena until its fitness is evaluated.

use crate::console::ParameterSource;
use crate::error::{Error, Result};
use crate::formula::Formula;
use crate::solver::{Search, SearchOutcome};
use bit_vec::BitVec;

/// Population size, iteration budget and operator rates for one run. Built
/// either from explicit values or from a [`ParameterSource`], where each
/// sentinel answer independently selects that parameter's default.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeneticConfig {
    pub population_size: usize,
    pub iterations: u64,
    pub crossover_rate: f64,
    pub mutation_rate: f64,
}

impl GeneticConfig {
    pub const DEFAULT_POPULATION_SIZE: usize = 20;
    pub const DEFAULT_ITERATIONS: u64 = 1_000_000;
    pub const DEFAULT_CROSSOVER_RATE: f64 = 0.75;
    pub const DEFAULT_MUTATION_RATE: f64 = 0.02;

    /// Prompts for all four parameters, falling back to the default for
    /// every sentinel answer.
    pub fn from_source(source: &mut dyn ParameterSource) -> Self {
        let mut config = Self::default();

        let population = source.integer(1, 1_000, "Genetic search: population size? ");
        if population == 0 {
            log::info!(
                "using default population size of {}",
                Self::DEFAULT_POPULATION_SIZE
            );
        } else {
            config.population_size = population as usize;
        }

        let iterations = source.integer(
            1,
            1_000_000_000,
            "Genetic search: number of iterations to allow? ",
        );
        if iterations == 0 {
            log::info!(
                "using default iteration budget of {}",
                Self::DEFAULT_ITERATIONS
            );
        } else {
            config.iterations = iterations;
        }

        let crossover = source.real(0.0, 1.0, "Genetic search: crossover rate? ");
        if crossover < 0.0 {
            log::info!(
                "using default crossover rate of {}",
                Self::DEFAULT_CROSSOVER_RATE
            );
        } else {
            config.crossover_rate = crossover;
        }

        let mutation = source.real(0.0, 1.0, "Genetic search: mutation rate? ");
        if mutation < 0.0 {
            log::info!(
                "using default mutation rate of {}",
                Self::DEFAULT_MUTATION_RATE
            );
        } else {
            config.mutation_rate = mutation;
        }

        config
    }
}

impl Default for GeneticConfig {
    fn default() -> Self {
        Self {
            population_size: Self::DEFAULT_POPULATION_SIZE,
            iterations: Self::DEFAULT_ITERATIONS,
            crossover_rate: Self::DEFAULT_CROSSOVER_RATE,
            mutation_rate: Self::DEFAULT_MUTATION_RATE,
        }
    }
}

/// Roulette-wheel selection with an in-pass goal check, then single-point
/// crossover and single-gene mutation, until the budget runs out or a
/// chromosome satisfies every clause.
#[derive(Debug)]
pub struct Genetic {
    config: GeneticConfig,
    rng: fastrand::Rng,
}

impl Genetic {
    #[must_use]
    pub fn new(config: GeneticConfig) -> Self {
        Self {
            config,
            rng: fastrand::Rng::new(),
        }
    }

    /// Same as [`Self::new`] with a deterministic random source.
    #[must_use]
    pub fn with_seed(config: GeneticConfig, seed: u64) -> Self {
        Self {
            config,
            rng: fastrand::Rng::with_seed(seed),
        }
    }

    fn random_population(&mut self, genes: usize) -> Vec<BitVec> {
        (0..self.config.population_size)
            .map(|_| {
                let mut chromosome = BitVec::from_elem(genes, false);
                for gene in 0..genes {
                    chromosome.set(gene, self.rng.bool());
                }
                chromosome
            })
            .collect()
    }

    /// Evaluates each slot in turn and builds the next generation from
    /// fitness-proportional donors. Returns true as soon as any chromosome
    /// reaches the goal fitness, leaving its genes in the arena.
    ///
    /// The donor for a slot is drawn from the running fitness prefix of the
    /// chromosomes evaluated so far in this pass, so only earlier slots are
    /// eligible. A zero running total makes the slot donate itself.
    fn select(
        &mut self,
        formula: &mut Formula,
        population: &mut Vec<BitVec>,
        goal: usize,
    ) -> bool {
        let mut next = Vec::with_capacity(population.len());
        let mut fitness = vec![0usize; population.len()];
        let mut fitness_sum = 0usize;

        for slot in 0..population.len() {
            formula.load_bits(&population[slot]);
            let fit = formula.satisfied_clause_count();
            fitness[slot] = fit;
            fitness_sum += fit;
            if fit == goal {
                return true;
            }

            let donor = if fitness_sum == 0 {
                slot
            } else {
                Self::spin_wheel(
                    self.rng.usize(0..fitness_sum),
                    &fitness[..=slot],
                )
            };
            next.push(population[donor].clone());
        }

        *population = next;
        false
    }

    /// Walks the evaluated fitness prefix until the drawn ticket is spent.
    #[allow(clippy::cast_possible_wrap)]
    fn spin_wheel(ticket: usize, fitness: &[usize]) -> usize {
        let mut remaining = ticket as i64;
        let mut donor = 0;
        loop {
            remaining -= fitness[donor] as i64;
            if remaining <= 0 {
                return donor;
            }
            donor += 1;
        }
    }

    /// With probability `crossover_rate` per chromosome, swaps all genes at
    /// and after a random cut point with a random mate.
    fn crossover(&mut self, population: &mut [BitVec], genes: usize) {
        for index in 0..population.len() {
            if self.rng.f64() < self.config.crossover_rate {
                let mate = self.rng.usize(0..population.len());
                let point = self.rng.usize(0..genes);
                Self::swap_tails(population, index, mate, point);
            }
        }
    }

    /// Swaps the genes of two chromosomes at and after `point`. Swapping a
    /// chromosome with itself is a no-op.
    fn swap_tails(population: &mut [BitVec], a: usize, b: usize, point: usize) {
        for gene in point..population[a].len() {
            let left = population[a][gene];
            let right = population[b][gene];
            population[a].set(gene, right);
            population[b].set(gene, left);
        }
    }

    /// With probability `mutation_rate` per chromosome, flips one random
    /// gene.
    fn mutate(&mut self, population: &mut [BitVec], genes: usize) {
        for chromosome in population.iter_mut() {
            if self.rng.f64() < self.config.mutation_rate {
                let gene = self.rng.usize(0..genes);
                let value = chromosome[gene];
                chromosome.set(gene, !value);
            }
        }
    }
}

impl Search for Genetic {
    fn name(&self) -> &'static str {
        "genetic search"
    }

    fn run(&mut self, formula: &mut Formula) -> Result<SearchOutcome> {
        let genes = formula.variable_count();
        if genes == 0 {
            return Err(Error::NoVariables);
        }

        let goal = formula.clause_count();
        let mut population = self.random_population(genes);

        log::info!(
            "evolving {} chromosomes for up to {} iterations",
            self.config.population_size,
            self.config.iterations
        );
        for iteration in 1..=self.config.iterations {
            if self.select(formula, &mut population, goal) {
                log::info!("found a satisfying assignment after {iteration} iteration(s)");
                return Ok(SearchOutcome::success(iteration, goal, formula.snapshot()));
            }
            self.crossover(&mut population, genes);
            self.mutate(&mut population, genes);
        }

        // no snapshot is tracked across iterations; report whatever the last
        // evaluated chromosome left in the arena
        let best_fitness = formula.satisfied_clause_count();
        log::info!("budget exhausted with final fitness {best_fitness}/{goal}");
        Ok(SearchOutcome::exhausted(
            self.config.iterations,
            best_fitness,
            formula.snapshot(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::Defaults;
    use crate::grammar;

    fn build(source: &str) -> Formula {
        grammar::parse(source).unwrap().try_into().unwrap()
    }

    fn seeded(config: GeneticConfig, seed: u64) -> Genetic {
        Genetic::with_seed(config, seed)
    }

    #[test]
    fn config_falls_back_to_defaults_on_sentinels() {
        let config = GeneticConfig::from_source(&mut Defaults);
        assert_eq!(config, GeneticConfig::default());
    }

    #[test]
    fn solves_the_complementary_pair() {
        let mut formula = build("x1|x2|x3\n!x1|!x2|!x3");
        let outcome = seeded(GeneticConfig::default(), 42)
            .run(&mut formula)
            .unwrap();
        assert!(outcome.satisfied);
        assert!(formula.is_fully_satisfied());
        assert_eq!(outcome.best_fitness, 2);
    }

    #[test]
    fn success_leaves_the_winning_genes_in_the_arena() {
        let mut formula = build("x1|x1|x1");
        let outcome = seeded(GeneticConfig::default(), 9)
            .run(&mut formula)
            .unwrap();
        assert!(outcome.satisfied);
        assert_eq!(outcome.best.values(), &[(1, true)]);
        assert!(formula.variables()[0].value());
    }

    #[test]
    fn swap_tails_exchanges_exactly_the_tail() {
        let genes = 8;
        let mut population = vec![
            BitVec::from_elem(genes, false),
            BitVec::from_elem(genes, true),
        ];
        let before: Vec<BitVec> = population.clone();
        let point = 3;
        Genetic::swap_tails(&mut population, 0, 1, point);
        for gene in 0..genes {
            if gene < point {
                assert_eq!(population[0][gene], before[0][gene]);
                assert_eq!(population[1][gene], before[1][gene]);
            } else {
                assert_eq!(population[0][gene], before[1][gene]);
                assert_eq!(population[1][gene], before[0][gene]);
            }
        }
    }

    #[test]
    fn swap_tails_with_itself_changes_nothing() {
        let mut population = vec![BitVec::from_elem(6, true)];
        let before = population.clone();
        Genetic::swap_tails(&mut population, 0, 0, 2);
        assert_eq!(population, before);
    }

    #[test]
    fn spin_wheel_lands_proportionally() {
        // a ticket equal to the running sum stays with the earlier donor
        let fitness = [2usize, 3, 5];
        assert_eq!(Genetic::spin_wheel(0, &fitness), 0);
        assert_eq!(Genetic::spin_wheel(2, &fitness), 0);
        assert_eq!(Genetic::spin_wheel(3, &fitness), 1);
        assert_eq!(Genetic::spin_wheel(5, &fitness), 1);
        assert_eq!(Genetic::spin_wheel(6, &fitness), 2);
        assert_eq!(Genetic::spin_wheel(9, &fitness), 2);
    }

    #[test]
    fn zero_fitness_pass_keeps_every_slot() {
        // all-false chromosomes satisfy nothing, so every slot donates itself
        let mut formula = build("x1|x1|x1\nx2|x2|x2");
        let config = GeneticConfig {
            population_size: 4,
            ..GeneticConfig::default()
        };
        let mut search = seeded(config, 5);
        let mut population = vec![BitVec::from_elem(2, false); 4];
        let before = population.clone();
        let goal = formula.clause_count();
        let found = search.select(&mut formula, &mut population, goal);
        assert!(!found);
        assert_eq!(population, before);
    }

    #[test]
    fn select_reports_a_goal_chromosome_immediately() {
        let mut formula = build("x1|x1|x1\nx2|x2|x2");
        let config = GeneticConfig {
            population_size: 2,
            ..GeneticConfig::default()
        };
        let mut search = seeded(config, 5);
        let winner = BitVec::from_elem(2, true);
        let mut population = vec![BitVec::from_elem(2, false), winner];
        let goal = formula.clause_count();
        let found = search.select(&mut formula, &mut population, goal);
        assert!(found);
        // the winner's genes are live in the arena
        assert!(formula.is_fully_satisfied());
    }
}
