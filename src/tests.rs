#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use ndarray::Array2;
    use pretty_assertions::assert_eq;
    use strum::VariantArray;
    use varisat::{CnfFormula, ExtendFormula, Lit, Solver, Var};

    use crate::card::{Card, Category, Room, Suspect, Weapon, DECK_SIZE};
    use crate::config::SolveConfig;
    use crate::error::Error;
    use crate::game::Game;
    use crate::knowledge::{narrow, Knowledge, Status, ValueSet};
    use crate::logic::exactly_k;
    use crate::party::{PartyId, PlayerSpec, Registry, SOLUTION_HOLDER};
    use crate::solver::{Assignment, Completion};
    use crate::turn::Turn;

    fn players(specs: &[(&str, i64)]) -> Vec<PlayerSpec> {
        specs.iter().map(|(name, hand_size)| PlayerSpec::new(*name, *hand_size)).collect()
    }

    fn new_game() -> Game {
        Game::new(players(&[("Will", 6), ("Julie", 6), ("Laura", 6)])).unwrap()
    }

    /// Will and Julie's hands are fully known, leaving MRS_WHITE, WRENCH and seven rooms between Laura and the solution.
    /// The solution must be MRS_WHITE with the WRENCH in one of seven rooms, and Laura holds the other six.
    fn seven_worlds() -> Game {
        let mut game = new_game();
        let will: [Card; 6] = [
            Card::from(Suspect::MissScarlet),
            Card::from(Suspect::ProfPlum),
            Card::from(Suspect::MrsPeacock),
            Card::from(Suspect::MrGreen),
            Card::from(Suspect::ColMustard),
            Card::from(Weapon::Candlestick),
        ];
        let julie: [Card; 6] = [
            Card::from(Weapon::Dagger),
            Card::from(Weapon::LeadPipe),
            Card::from(Weapon::Revolver),
            Card::from(Weapon::Rope),
            Card::from(Room::Kitchen),
            Card::from(Room::Ballroom),
        ];
        will.into_iter().for_each(|card| game.assert_fact("Will", card, true).unwrap());
        julie.into_iter().for_each(|card| game.assert_fact("Julie", card, true).unwrap());
        game
    }

    fn open_rooms() -> BTreeSet<Card> {
        [Room::Conservatory, Room::DiningRoom, Room::BilliardRoom, Room::Library, Room::Lounge, Room::Hall, Room::Study]
            .into_iter()
            .map(Card::from)
            .collect()
    }

    fn unresolved(knowledge: &Knowledge) -> Vec<BTreeSet<Card>> {
        Category::VARIANTS.iter()
            .map(|category| knowledge.unresolved(*category).into_iter().collect())
            .collect()
    }

    #[test]
    fn catalog_indices() {
        assert_eq!(Card::all().count(), DECK_SIZE);
        assert_eq!(DECK_SIZE, 21);
        for (index, card) in Card::all().enumerate() {
            assert_eq!(card.index(), index);
            assert_eq!(Card::from_index(index), Some(card));
            assert!(card.category().span().contains(&index));
        }
        assert_eq!(Card::from_index(DECK_SIZE), None);
        assert_eq!(Category::Room.cards().count(), 9);
    }

    #[test]
    fn card_names() {
        assert_eq!(Card::from(Room::BilliardRoom).to_string(), "BILLIARD_ROOM");
        assert_eq!("MISS_SCARLET".parse::<Card>(), Ok(Card::Suspect(Suspect::MissScarlet)));
        assert_eq!("candlestick".parse::<Card>(), Ok(Card::Weapon(Weapon::Candlestick)));
        assert_eq!("SPANNER".parse::<Card>(), Err(Error::UnknownCard("SPANNER".to_owned())));
    }

    #[test]
    fn registry_order() {
        let registry = Registry::create(players(&[("Will", 6), ("Julie", 6), ("Laura", 6)])).unwrap();
        assert_eq!(registry.names(), vec![SOLUTION_HOLDER, "Will", "Julie", "Laura"]);
        assert_eq!(registry.id_of(SOLUTION_HOLDER), Ok(PartyId::SOLUTION_HOLDER));
        assert_eq!(registry.id_of("Laura").map(PartyId::index), Ok(3));
        assert_eq!(registry.id_of("Bob"), Err(Error::UnknownParty("Bob".to_owned())));
    }

    #[test]
    fn registry_rejects_duplicates() {
        assert_eq!(
            Registry::create(players(&[("Will", 9), ("Will", 9)])).unwrap_err(),
            Error::DuplicateName("Will".to_owned())
        );
        assert_eq!(
            Game::new(players(&[("Murderer", 3)])).err(),
            Some(Error::DuplicateName("Murderer".to_owned()))
        );
    }

    #[test]
    fn registry_rejects_bad_counts() {
        assert_eq!(
            Registry::create(players(&[("Will", -1)])).unwrap_err(),
            Error::InvalidCount { name: "Will".to_owned(), count: -1 }
        );
    }

    #[test]
    fn impossible_hand_finds_no_world() {
        // more cards than the deck holds: accepted, but no deal satisfies it
        let mut game = Game::new(players(&[("Will", 22)])).unwrap();
        assert_eq!(game.registry().get(PartyId(1)).map(|party| party.hand_size()), Some(22));
        let report = game.solve_with(&SolveConfig::unbounded()).unwrap();
        assert_eq!(report.solutions, 0);
        assert_eq!(report.completion, Completion::Exhaustive);
        assert_eq!(game.knowledge("Will"), Err(Error::NoWorlds));
    }

    #[test]
    fn variable_count() {
        assert_eq!(new_game().model().variable_count(), 4 * 21);
        let game = Game::new(players(&[("Solo", 18)])).unwrap();
        assert_eq!(game.model().variable_count(), 2 * 21);
    }

    #[test]
    fn failed_mutations_leave_model_alone() {
        let mut game = new_game();
        let clauses = game.model().clause_count();

        assert_eq!(game.assert_fact("Bob", Weapon::Rope, true), Err(Error::UnknownParty("Bob".to_owned())));
        assert!(matches!(game.assert_disjunction("Will", Vec::<Card>::new()), Err(Error::InvalidArgument(_))));
        assert_eq!(
            game.assert_disjunction("Bob", [Card::from(Weapon::Rope)]),
            Err(Error::UnknownParty("Bob".to_owned()))
        );
        assert_eq!(game.model().clause_count(), clauses);

        game.assert_disjunction("Will", [Card::from(Weapon::Rope), Card::from(Room::Hall)]).unwrap();
        assert_eq!(game.model().clause_count(), clauses + 1);
    }

    #[test]
    fn knowledge_before_solve() {
        let game = new_game();
        assert_eq!(game.knowledge("Will"), Err(Error::NotSolved));
        assert_eq!(game.knowledge("Bob"), Err(Error::UnknownParty("Bob".to_owned())));
    }

    #[test]
    fn seven_worlds_exhaustive() {
        let mut game = seven_worlds();
        let report = game.solve_with(&SolveConfig::unbounded()).unwrap();
        assert_eq!(report.solutions, 7);
        assert_eq!(report.completion, Completion::Exhaustive);

        let solution = game.knowledge(SOLUTION_HOLDER).unwrap();
        assert_eq!(solution.get(Suspect::MrsWhite), ValueSet::KNOWN_TRUE);
        assert_eq!(solution.get(Suspect::MissScarlet), ValueSet::KNOWN_FALSE);
        assert_eq!(solution.status(Weapon::Wrench), Status::KnownTrue);
        assert_eq!(solution.status(Room::Kitchen), Status::KnownFalse);
        assert_eq!(unresolved(&solution), vec![BTreeSet::new(), BTreeSet::new(), open_rooms()]);

        let laura = game.knowledge("Laura").unwrap();
        assert_eq!(laura.status(Suspect::MrsWhite), Status::KnownFalse);
        assert_eq!(laura.status(Weapon::Wrench), Status::KnownFalse);
        assert_eq!(laura.category(Category::Room).get(&Card::from(Room::Study)), Some(&ValueSet::UNRESOLVED));
        assert_eq!(unresolved(&laura), vec![BTreeSet::new(), BTreeSet::new(), open_rooms()]);

        let will = game.knowledge("Will").unwrap();
        assert!(will.is_resolved());
        assert_eq!(will.held().len(), 6);
    }

    #[test]
    fn worlds_respect_the_rules() {
        let mut game = seven_worlds();
        game.solve_with(&SolveConfig::unbounded()).unwrap();
        let mut capped = new_game();
        capped.solve_with(&SolveConfig::unbounded().with_max_solutions(40)).unwrap();

        for world in game.solutions().unwrap().solutions().iter().chain(capped.solutions().unwrap().solutions()) {
            assert_eq!(world.party_count(), 4);
            for card in Card::all() {
                let holders = (0..4).filter(|party| world.holds(PartyId(*party), card)).count();
                assert_eq!(holders, 1, "{card} held by {holders} parties");
                assert!(world.holder_of(card).is_some());
            }
            let solution = world.hand(PartyId::SOLUTION_HOLDER).collect::<Vec<_>>();
            assert_eq!(solution.iter().map(|card| card.category()).collect::<Vec<_>>(), Category::VARIANTS.to_vec());
            for party in 1..4 {
                assert_eq!(world.hand(PartyId(party)).count(), 6);
            }
        }
    }

    #[test]
    fn worlds_are_distinct() {
        let mut game = new_game();
        game.solve_with(&SolveConfig::unbounded().with_max_solutions(25)).unwrap();
        let worlds = game.solutions().unwrap().solutions();
        for (i, a) in worlds.iter().enumerate() {
            for b in &worlds[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn unconstrained_game_is_partial() {
        let mut game = new_game();
        let report = game.solve_with(&SolveConfig::unbounded().with_max_solutions(50)).unwrap();
        assert_eq!(report.solutions, 50);
        assert_eq!(report.completion, Completion::Partial);

        // distinct worlds must disagree about somebody's hand
        let all = game.all_knowledge().unwrap();
        assert_eq!(all.iter().map(|(name, _)| name.as_str()).collect::<Vec<_>>(), game.player_names());
        assert!(all.iter().any(|(_, knowledge)| !knowledge.is_resolved()));

        let report = game.solve_with(&SolveConfig::unbounded().with_time_limit(0.05)).unwrap();
        assert_eq!(report.completion, Completion::Partial);
    }

    #[test]
    fn holder_of_candlestick() {
        let mut game = new_game();
        game.assert_fact("Will", Weapon::Candlestick, true).unwrap();
        let report = game.solve_with(&SolveConfig::unbounded().with_max_solutions(30)).unwrap();
        assert!(report.solutions > 0);

        assert_eq!(game.knowledge("Will").unwrap().get(Weapon::Candlestick), ValueSet::KNOWN_TRUE);
        for party in [SOLUTION_HOLDER, "Julie", "Laura"] {
            assert_eq!(game.knowledge(party).unwrap().get(Weapon::Candlestick), ValueSet::KNOWN_FALSE, "{party}");
        }
    }

    #[test]
    fn pinned_solution() {
        let mut game = seven_worlds();
        game.assert_fact("Laura", Room::Study, false).unwrap();
        let report = game.solve_with(&SolveConfig::unbounded()).unwrap();
        assert_eq!(report.solutions, 1);
        assert_eq!(report.completion, Completion::Exhaustive);

        let solution = game.knowledge(SOLUTION_HOLDER).unwrap();
        assert!(unresolved(&solution).iter().all(BTreeSet::is_empty));
        assert_eq!(solution.held(), vec![Card::from(Suspect::MrsWhite), Card::from(Weapon::Wrench), Card::from(Room::Study)]);
        for (_, knowledge) in game.all_knowledge().unwrap() {
            assert!(knowledge.is_resolved());
        }
    }

    #[test]
    fn contradiction_finds_no_world() {
        let mut game = seven_worlds();
        game.assert_fact("Laura", Suspect::MrsWhite, true).unwrap();
        let report = game.solve_with(&SolveConfig::unbounded()).unwrap();
        assert_eq!(report.solutions, 0);
        assert_eq!(report.completion, Completion::Exhaustive);
        assert_eq!(game.knowledge("Laura"), Err(Error::NoWorlds));
    }

    #[test]
    fn knowledge_is_idempotent() {
        let mut game = seven_worlds();
        game.solve_with(&SolveConfig::unbounded()).unwrap();
        assert_eq!(game.knowledge("Laura").unwrap(), game.knowledge("Laura").unwrap());
        assert_eq!(game.all_knowledge().unwrap(), game.all_knowledge().unwrap());
    }

    #[test]
    fn facts_only_narrow() {
        let mut game = seven_worlds();
        game.solve_with(&SolveConfig::unbounded()).unwrap();
        let before = game.all_knowledge().unwrap();

        game.assert_disjunction("Laura", [Card::from(Suspect::MrsWhite), Card::from(Weapon::Wrench), Card::from(Room::Hall)]).unwrap();
        let report = game.solve_with(&SolveConfig::unbounded()).unwrap();
        assert_eq!(report.solutions, 6);
        let after = game.all_knowledge().unwrap();

        for ((name, old), (_, new)) in before.iter().zip(&after) {
            for (old, new) in unresolved(old).iter().zip(unresolved(new)) {
                assert!(new.is_subset(old), "{name}: {new:?} is not within {old:?}");
            }
        }
        assert_eq!(game.knowledge("Laura").unwrap().status(Room::Hall), Status::KnownTrue);
    }

    #[test]
    fn early_exit_matches_full_scan() {
        let mut game = seven_worlds();
        game.solve_with(&SolveConfig::unbounded()).unwrap();
        let mut capped = new_game();
        capped.solve_with(&SolveConfig::unbounded().with_max_solutions(60)).unwrap();

        for game in [&game, &capped] {
            let worlds = game.solutions().unwrap().solutions();
            for (id, _) in game.registry().iter() {
                let knowledge = narrow(id, worlds).unwrap();
                for card in Card::all() {
                    let mut seen = ValueSet::default();
                    worlds.iter().for_each(|world| seen.insert(world.holds(id, card)));
                    assert_eq!(knowledge.get(card), seen, "{id:?} {card}");
                }
            }
        }
    }

    #[test]
    fn narrowing_stops_once_everything_is_unresolved() {
        let everything = Assignment::from_table(Array2::from_shape_fn((2, DECK_SIZE), |(party, _)| party == 1));
        let nothing = Assignment::from_table(Array2::from_shape_fn((2, DECK_SIZE), |(party, _)| party == 0));
        let worlds = vec![everything.clone(), nothing, everything.clone(), everything];

        let mut consumed = 0;
        let knowledge = narrow(PartyId(1), worlds.iter().inspect(|_| consumed += 1)).unwrap();
        assert_eq!(consumed, 2);
        assert!(Card::all().all(|card| knowledge[card] == ValueSet::UNRESOLVED));

        assert_eq!(narrow(PartyId(1), Vec::<Assignment>::new()), Err(Error::NoWorlds));
    }

    #[test]
    fn survey_matches_solve() {
        let mut game = seven_worlds();
        game.solve_with(&SolveConfig::unbounded()).unwrap();
        for name in ["Laura", SOLUTION_HOLDER] {
            let (knowledge, completion) = game.survey(name, &SolveConfig::unbounded()).unwrap();
            assert_eq!(completion, Completion::Exhaustive);
            assert_eq!(knowledge, game.knowledge(name).unwrap());
        }
        assert_eq!(game.survey("Bob", &SolveConfig::unbounded()).err(), Some(Error::UnknownParty("Bob".to_owned())));
    }

    #[test]
    fn survey_settles_when_nothing_can_be_learned() {
        // Solo holds every card the solution does not: 6 * 6 * 9 worlds, and every card goes both ways
        let mut game = Game::new(players(&[("Solo", 18)])).unwrap();
        for name in ["Solo", SOLUTION_HOLDER] {
            let (knowledge, completion) = game.survey(name, &SolveConfig::unbounded()).unwrap();
            assert_eq!(completion, Completion::Settled, "{name}");
            assert!(Card::all().all(|card| knowledge.status(card) == Status::Unresolved), "{name}");
            assert!(unresolved(&knowledge).iter().zip(Category::VARIANTS).all(|(cards, category)| cards.len() == category.cards().count()));
        }
        assert!(game.solutions().is_none());

        let report = game.solve_with(&SolveConfig::unbounded()).unwrap();
        assert_eq!(report.solutions, 6 * 6 * 9);
        assert_eq!(report.completion, Completion::Exhaustive);
        assert_eq!(game.survey("Solo", &SolveConfig::unbounded()).unwrap().0, game.knowledge("Solo").unwrap());
    }

    #[test]
    fn turns_become_facts() {
        let mut game = seven_worlds();
        game.record_turn(Turn::all_false("Laura", [Card::from(Suspect::MrsWhite), Card::from(Room::Study)])).unwrap();
        game.solve_with(&SolveConfig::unbounded()).unwrap();
        assert_eq!(game.solutions().unwrap().len(), 1);
        assert_eq!(game.knowledge(SOLUTION_HOLDER).unwrap().status(Room::Study), Status::KnownTrue);

        let mut game = seven_worlds();
        game.record_turn(Turn::some_true("Laura", [Card::from(Room::Lounge)])).unwrap();
        game.record_turn(Turn::some_true("Laura", [Card::from(Weapon::Wrench), Card::from(Room::Hall)])).unwrap();
        game.solve_with(&SolveConfig::unbounded()).unwrap();
        assert_eq!(game.solutions().unwrap().len(), 5);
        assert_eq!(game.history().len(), 2);
    }

    #[test]
    fn rejected_turns_change_nothing() {
        let mut game = new_game();
        let clauses = game.model().clause_count();

        let rejected = [
            Turn::some_true(SOLUTION_HOLDER, [Card::from(Room::Hall)]),
            Turn::some_true("Will", Vec::<Card>::new()),
            Turn::all_false("Will", [Card::from(Room::Hall), Card::from(Room::Study)]),
        ];
        for turn in rejected {
            assert!(matches!(game.record_turn(turn), Err(Error::InvalidArgument(_))));
        }
        assert_eq!(
            game.record_turn(Turn::all_false("Bob", [Card::from(Room::Hall)])),
            Err(Error::UnknownParty("Bob".to_owned()))
        );

        assert!(game.history().is_empty());
        assert_eq!(game.model().clause_count(), clauses);
    }

    #[test]
    fn turn_from_json() {
        let turn: Turn = serde_json::from_str(r#"{"player": "Will", "response": "SOME_TRUE", "cards": ["KITCHEN", "rope"]}"#).unwrap();
        assert_eq!(turn, Turn::some_true("Will", [Card::from(Room::Kitchen), Card::from(Weapon::Rope)]));
        assert_eq!(serde_json::to_string(&Card::from(Room::DiningRoom)).unwrap(), r#""DINING_ROOM""#);
        assert!(serde_json::from_str::<Turn>(r#"{"player": "Will", "response": "ALL_FALSE", "cards": ["SPANNER"]}"#).is_err());
    }

    #[test]
    fn config_defaults_and_limits() {
        let config: SolveConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, SolveConfig::default());
        assert_eq!(config.time_budget().unwrap().map(|budget| budget.as_secs()), Some(60));

        let config: SolveConfig = serde_json::from_str(r#"{"max_solutions": 10}"#).unwrap();
        assert_eq!(config.max_solutions, Some(10));

        assert_eq!(SolveConfig::unbounded().with_time_limit(0.0).time_budget(), Ok(None));
        assert!(matches!(SolveConfig::unbounded().with_time_limit(-1.0).time_budget(), Err(Error::InvalidArgument(_))));
        assert!(matches!(new_game().solve_with(&SolveConfig::unbounded().with_time_limit(f64::NAN)), Err(Error::InvalidArgument(_))));
    }

    /// Count the models of `formula` projected onto its first `n` variables.
    fn count_projected(formula: &CnfFormula, n: usize) -> usize {
        let mut solver = Solver::new();
        solver.add_formula(formula);
        let mut count = 0;
        while solver.solve().unwrap() {
            let model = solver.model().unwrap();
            let blocking = model[..n].iter().map(|lit| !*lit).collect::<Vec<Lit>>();
            solver.add_clause(&blocking);
            count += 1;
        }
        count
    }

    #[test]
    fn sequential_counter_counts() {
        // C(5, k)
        for (k, expected) in [(0, 1), (1, 5), (2, 10), (3, 10), (4, 5), (5, 1), (6, 0)] {
            let mut formula = CnfFormula::new();
            formula.set_var_count(5);
            let lits = (0..5).map(|index| Var::from_index(index).positive()).collect::<Vec<_>>();
            exactly_k(&mut formula, &lits, k);
            assert_eq!(count_projected(&formula, 5), expected, "exactly {k} of 5");
        }
    }
}
