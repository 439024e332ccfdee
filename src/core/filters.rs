use crate::models::PreferenceProfile;

/// Check whether `candidate` satisfies what `seeker` asks for
///
/// One direction only; see [`is_compatible`] for the symmetric check.
#[inline]
pub fn accepts(seeker: &PreferenceProfile, candidate: &PreferenceProfile) -> bool {
    seeker.wanted_gender.accepts(&candidate.gender)
        && seeker.wanted_age_bracket.accepts(&candidate.age_bracket)
}

/// Two profiles are compatible when each accepts the other
#[inline]
pub fn is_compatible(u: &PreferenceProfile, v: &PreferenceProfile) -> bool {
    u.requester_id != v.requester_id && accepts(u, v) && accepts(v, u)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AgeBracket, Gender, Wanted};

    fn create_test_profile(
        id: &str,
        gender: Gender,
        age: AgeBracket,
        wanted_gender: Wanted<Gender>,
        wanted_age: Wanted<AgeBracket>,
    ) -> PreferenceProfile {
        PreferenceProfile::new(id, gender, age, wanted_gender, wanted_age)
    }

    #[test]
    fn test_mutual_exact_match() {
        let u = create_test_profile(
            "u",
            Gender::Male,
            AgeBracket::Age26To35,
            Wanted::Exactly(Gender::Female),
            Wanted::Exactly(AgeBracket::Age26To35),
        );
        let v = create_test_profile(
            "v",
            Gender::Female,
            AgeBracket::Age26To35,
            Wanted::Exactly(Gender::Male),
            Wanted::Exactly(AgeBracket::Age26To35),
        );

        assert!(is_compatible(&u, &v));
    }

    #[test]
    fn test_one_sided_interest_fails() {
        let u = create_test_profile("u", Gender::Male, AgeBracket::Age18To25, Wanted::Any, Wanted::Any);
        let v = create_test_profile(
            "v",
            Gender::Female,
            AgeBracket::Age18To25,
            Wanted::Exactly(Gender::Female),
            Wanted::Any,
        );

        assert!(accepts(&u, &v));
        assert!(!accepts(&v, &u));
        assert!(!is_compatible(&u, &v));
    }

    #[test]
    fn test_age_mismatch_fails() {
        let u = create_test_profile(
            "u",
            Gender::Male,
            AgeBracket::Age18To25,
            Wanted::Any,
            Wanted::Exactly(AgeBracket::Age45Plus),
        );
        let v = create_test_profile("v", Gender::Female, AgeBracket::Age36To45, Wanted::Any, Wanted::Any);

        assert!(!is_compatible(&u, &v));
    }

    #[test]
    fn test_same_requester_never_compatible() {
        let u = create_test_profile("u", Gender::Male, AgeBracket::Age18To25, Wanted::Any, Wanted::Any);
        assert!(!is_compatible(&u, &u.clone()));
    }

    #[test]
    fn test_symmetry_over_all_combinations() {
        let genders = [Gender::Male, Gender::Female];
        let wanted_genders = [Wanted::Any, Wanted::Exactly(Gender::Male), Wanted::Exactly(Gender::Female)];
        let wanted_ages = [
            Wanted::Any,
            Wanted::Exactly(AgeBracket::Age18To25),
            Wanted::Exactly(AgeBracket::Age45Plus),
        ];
        let ages = [AgeBracket::Age18To25, AgeBracket::Age45Plus];

        let mut profiles = Vec::new();
        for g in genders {
            for a in ages {
                for wg in wanted_genders {
                    for wa in wanted_ages {
                        let id = format!("p{}", profiles.len());
                        profiles.push(create_test_profile(&id, g, a, wg, wa));
                    }
                }
            }
        }

        for u in &profiles {
            for v in &profiles {
                assert_eq!(is_compatible(u, v), is_compatible(v, u));
            }
        }
    }
}
