//! Compiled-in library of potato leaf diseases.

use crate::types::Disease;

pub static DISEASES: &[Disease] = &[
    Disease {
        id: "early-blight",
        name: "Early Blight",
        short: "Dark target-like spots on older leaves.",
        image: "assets/images/early-blight.jpg",
        full: "• Symptoms: Dark brown to black lesions with concentric rings on older leaves, \
               often described as a \"target spot\" appearance. These lesions can coalesce, \
               leading to extensive leaf blight.\n\n\
               • Impact: Premature defoliation reduces photosynthetic capacity, leading to \
               smaller tubers and decreased yields.\n\n\
               • Management: Implement crop rotation, remove plant debris, and apply \
               appropriate fungicides when necessary.",
    },
    Disease {
        id: "late-blight",
        name: "Late Blight",
        short: "Rapidly spreading brown lesions.",
        image: "assets/images/late-blight.jpg",
        full: "• Symptoms: Water-soaked lesions on leaves that rapidly expand, turning brown \
               and leading to leaf collapse. White fungal growth may appear under leaves.\n\n\
               • Impact: Can devastate entire fields within days.\n\n\
               • Management: Use resistant varieties, ensure proper field sanitation, and \
               apply fungicides preventatively.",
    },
    Disease {
        id: "leaf-roll",
        name: "Leaf Roll",
        short: "Upward rolling and stiffening of leaflets.",
        image: "assets/images/leaf-roll.jpg",
        full: "• Symptoms: Lower leaves roll upward along their length and turn stiff and \
               leathery, sometimes with pale or reddened margins. New growth stays upright \
               and stunted.\n\n\
               • Impact: Infected plants produce fewer and smaller tubers, and the virus \
               causes net necrosis in the tuber flesh of sensitive varieties.\n\n\
               • Management: Plant certified virus-free seed, control aphid vectors, and \
               rogue out infected plants as soon as they are noticed.",
    },
    Disease {
        id: "septoria",
        name: "Septoria Leaf Spot",
        short: "Small gray-centered spots with dark borders.",
        image: "assets/images/septoria.jpg",
        full: "• Symptoms: Small circular spots with gray or tan centers and dark brown \
               margins, first on the oldest leaves. Tiny black fruiting bodies may be \
               visible in the center of mature spots.\n\n\
               • Impact: Heavy spotting causes leaves to yellow and drop early, weakening \
               the plant and exposing tubers to sunscald.\n\n\
               • Management: Rotate away from solanaceous crops, remove infected debris \
               after harvest, and apply protectant fungicides during wet weather.",
    },
    Disease {
        id: "psyllid",
        name: "Psyllid",
        short: "Yellowing and cupping caused by psyllid feeding.",
        image: "assets/images/psyllid.jpg",
        full: "• Symptoms: Leaflets cup upward and turn yellow or purple starting at the \
               top of the plant, while nymphs feed on the underside of leaves. Plants \
               become stunted with shortened internodes.\n\n\
               • Impact: Feeding toxins reduce yield, and the insect spreads the bacterium \
               responsible for zebra chip, which ruins tuber quality.\n\n\
               • Management: Scout the underside of leaves regularly, treat when nymphs \
               are found, and avoid planting next to overwintering hosts.",
    },
];

/// Looks up a disease by its identifier.
pub fn find(id: &str) -> Option<&'static Disease> {
    DISEASES.iter().find(|disease| disease.id == id)
}

/// Case-insensitive substring search over names and summaries. An empty
/// query matches everything.
pub fn search(query: &str) -> Vec<&'static Disease> {
    let needle = query.to_lowercase();
    DISEASES
        .iter()
        .filter(|disease| {
            disease.name.to_lowercase().contains(&needle)
                || disease.short.to_lowercase().contains(&needle)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn ids_are_unique() {
        let ids: HashSet<_> = DISEASES.iter().map(|d| d.id).collect();
        assert_eq!(ids.len(), DISEASES.len());
    }

    #[test]
    fn find_resolves_known_ids() {
        assert_eq!(find("late-blight").map(|d| d.name), Some("Late Blight"));
        assert!(find("powdery-mildew").is_none());
    }

    #[test]
    fn search_is_case_insensitive_over_name_and_summary() {
        let by_name = search("BLIGHT");
        assert_eq!(by_name.len(), 2);

        let by_summary = search("cupping");
        assert_eq!(by_summary.len(), 1);
        assert_eq!(by_summary[0].id, "psyllid");
    }

    #[test]
    fn empty_search_returns_the_whole_library() {
        assert_eq!(search("").len(), DISEASES.len());
    }
}
