use super::*;

#[test]
fn test_stat_parses_keys_and_aliases() {
    assert_eq!("hp".parse::<Stat>(), Ok(Stat::Vitality));
    assert_eq!("Vitality".parse::<Stat>(), Ok(Stat::Vitality));
    assert_eq!("special-attack".parse::<Stat>(), Ok(Stat::SpecialOffense));
    assert_eq!("special_offense".parse::<Stat>(), Ok(Stat::SpecialOffense));
    assert_eq!("Special Defense".parse::<Stat>(), Ok(Stat::SpecialDefense));
    let err = "luck".parse::<Stat>().unwrap_err();
    assert_eq!(err, UnknownStat("luck".to_string()));
    assert_eq!(err.to_string(), "unknown stat 'luck'");
}

#[test]
fn test_stat_keys_round_trip() {
    for stat in Stat::ALL.iter() {
        assert_eq!(stat.key().parse::<Stat>(), Ok(*stat));
    }
}

#[test]
fn test_stat_serde_uses_attribute_keys() {
    let json = serde_json::to_string(&Stat::SpecialOffense).unwrap();
    assert_eq!(json, "\"special-attack\"");
    let parsed: Stat = serde_json::from_str("\"offense\"").unwrap();
    assert_eq!(parsed, Stat::Offense);
}

#[test]
fn test_attribute_label() {
    assert_eq!(attribute_label("special-defense"), "Special Defense");
    assert_eq!(attribute_label("hp"), "HP");
    assert_eq!(attribute_label("evasion-rate"), "Evasion Rate");
}

#[test]
fn test_capitalize() {
    assert_eq!(capitalize("pikachu"), "Pikachu");
    assert_eq!(capitalize("MEW"), "Mew");
    assert_eq!(capitalize(""), "");
}
