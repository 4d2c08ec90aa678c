use crate::forms::{ApplicationForm, ContactForm};

pub(super) fn contact() -> ContactForm {
    ContactForm {
        name: "Priya Natarajan".to_string(),
        email: "Priya.N@University.edu".to_string(),
        subject: "Speaker request".to_string(),
        message: "Could a club analyst present at our finance seminar next month?".to_string(),
    }
}

pub(super) fn application() -> ApplicationForm {
    ApplicationForm {
        name: "Marcus Webb".to_string(),
        email: "mwebb@university.edu".to_string(),
        phone: "+1 (515) 555-0142".to_string(),
        year: "sophomore".to_string(),
        major: "Finance".to_string(),
        gpa: "3.50".to_string(),
        experience: "Ran a paper portfolio in the campus trading competition.".to_string(),
        motivation: "I want hands-on experience researching equities and pitching ideas to a real investment committee."
            .to_string(),
    }
}
