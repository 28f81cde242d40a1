//! Shared test records.

use std::io::Cursor;

use super::cv::{CvDocument, Education, Experience, PersonalInfo};

pub fn sample_cv() -> CvDocument {
    CvDocument {
        personal_info: PersonalInfo {
            name: "Ada Lovelace".to_string(),
            email: "ada@x.com".to_string(),
            phone: "+44 20 7946 0000".to_string(),
            address: "London, UK".to_string(),
            linkedin: "https://linkedin.com/in/ada".to_string(),
            github: String::new(),
            website: "ada.dev".to_string(),
            target_position: "Engineer".to_string(),
            photo: Some(vec![1, 2, 3, 4]),
        },
        summary: "Mathematician and first programmer.".to_string(),
        experience: vec![Experience {
            role: "Analyst".to_string(),
            organization: "Analytical Engine Co".to_string(),
            period: "1842 - 1843".to_string(),
            description: "Developed the first published algorithm.".to_string(),
        }],
        education: vec![Education {
            institution: "Home tutoring".to_string(),
            degree: "Mathematics".to_string(),
            year: "1835".to_string(),
        }],
        skills: vec!["Mathematics".to_string(), "Algorithms".to_string()],
        certifications: vec!["Royal Society".to_string()],
        projects: vec![],
        languages: vec!["English".to_string(), "French".to_string()],
        hobbies: vec!["Horse riding".to_string()],
    }
}

/// Same as `sample_cv` but with a decodable 8x6 PNG photo.
pub fn sample_cv_with_photo() -> CvDocument {
    let mut cv = sample_cv();
    cv.personal_info.photo = Some(tiny_png());
    cv
}

/// A CV with many skills and long text, enough to overflow one page.
pub fn long_cv() -> CvDocument {
    let mut cv = sample_cv_with_photo();
    cv.skills = (1..=20).map(|i| format!("Skill {i}")).collect();
    cv.experience = (1..=12)
        .map(|i| Experience {
            role: format!("Role {i}"),
            organization: format!("Company {i}"),
            period: format!("{} - {}", 2000 + i, 2001 + i),
            description: "Led a team that increased throughput by 30% while reducing costs. "
                .repeat(6),
        })
        .collect();
    cv
}

/// Name, email, position and two skills; nothing else.
pub fn scenario_a() -> CvDocument {
    CvDocument {
        personal_info: PersonalInfo {
            name: "Ada Lovelace".to_string(),
            email: "ada@x.com".to_string(),
            target_position: "Engineer".to_string(),
            ..PersonalInfo::default()
        },
        skills: vec!["Mathematics".to_string(), "Poetry".to_string()],
        ..CvDocument::default()
    }
}

/// `scenario_a` plus a 60-word summary, two jobs (one with a metric), one
/// degree and nine skills.
pub fn scenario_b() -> CvDocument {
    let mut cv = scenario_a();
    cv.summary = vec!["word"; 60].join(" ");
    cv.experience = vec![
        Experience {
            role: "Analyst".to_string(),
            description: "Increased revenue 30% in one year".to_string(),
            ..Experience::default()
        },
        Experience {
            role: "Translator".to_string(),
            ..Experience::default()
        },
    ];
    cv.education = vec![Education {
        institution: "Home tutoring".to_string(),
        ..Education::default()
    }];
    cv.skills = (1..=9).map(|i| format!("Skill {i}")).collect();
    cv
}

pub fn tiny_png() -> Vec<u8> {
    let img = image::RgbImage::from_fn(8, 6, |x, y| image::Rgb([(x * 30) as u8, (y * 40) as u8, 200]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png).unwrap();
    out.into_inner()
}
