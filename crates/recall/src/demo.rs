//! Built-in sample corpus so the tool can be tried with zero setup.
//!
//! The documents are campus-flavored and go through the ordinary ingest
//! path; nothing about them is special beyond their fixed ids.

use chrono::Utc;
use std::path::PathBuf;

use recall_core::models::Document;

use crate::docstore::{fingerprint, LoadedDocument};

pub fn demo_documents() -> Vec<LoadedDocument> {
    [
        (
            "demo-course-policy",
            "NLP Course Policy",
            "course-policy.md",
            "This course covers Natural Language Processing fundamentals: tokenization, \
             language models, tagging, parsing, and an introduction to distributional \
             semantics. Lectures run twice a week with a weekly lab session.\n\n\
             Attendance of 75% is mandatory to sit in the final exam. Attendance is \
             recorded in both lectures and labs. Students below the threshold must \
             petition the course coordinator with documented justification.\n\n\
             Grading is based on four assignments (40%), a final project (30%), and the \
             final exam (30%). Late submissions lose 10% per day, up to three days; \
             after that the submission is not accepted.",
        ),
        (
            "demo-course-syllabus",
            "Course Syllabus",
            "course-syllabus.md",
            "Weeks 1-3 cover text processing: tokenization, normalization, and edit \
             distance. Weeks 4-6 cover n-gram language models and smoothing. Weeks 7-9 \
             cover part-of-speech tagging and hidden Markov models.\n\n\
             Weeks 10-12 cover constituency and dependency parsing. The final weeks \
             introduce distributional semantics and review for the exam. The course \
             textbook is Jurafsky and Martin, third edition draft; readings are \
             assigned per week on the course page.",
        ),
        (
            "demo-library-faq",
            "Library FAQ",
            "library-faq.md",
            "The library is open from 8am to 10pm on weekdays and 10am to 6pm on \
             weekends. The reading rooms on the second floor are reservable in \
             two-hour blocks through the library portal.\n\n\
             Students may borrow up to eight books at a time for four weeks each. \
             Loans renew automatically twice unless another reader places a hold. \
             Course reserve materials are restricted to in-library use for two hours.",
        ),
        (
            "demo-lab-guide",
            "Lab Guide",
            "lab-guide.md",
            "Lab assignments are submitted through the course git server; each \
             assignment repository is created for you when the assignment is \
             released. Push your work before the deadline; the grader checks out the \
             last commit on the main branch.\n\n\
             The shared compute cluster gives every student a quota of 20 GPU hours \
             per assignment. Batch jobs are submitted with the queue tool; interactive \
             sessions are limited to 30 minutes. Store datasets under the scratch \
             volume, which is cleaned monthly.",
        ),
    ]
    .into_iter()
    .map(|(id, title, file, content)| LoadedDocument {
        document: Document {
            id: id.to_string(),
            title: title.to_string(),
            content: content.to_string(),
            upload_date: Utc::now(),
            chunk_count: None,
        },
        path: PathBuf::from("built-in").join(file),
        fingerprint: fingerprint(content),
    })
    .collect()
}
